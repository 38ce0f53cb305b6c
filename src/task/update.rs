//! UpdateTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Update a tracked task's fields, optionally renaming it or moving it to
/// another column.
///
/// A changed name re-derives the id, so the task file and index entry are
/// renamed along with it.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    /// The task id to update
    pub id: String,
    /// New name; implies a rename when the derived id changes
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Move the task to this column (appended)
    pub column: Option<String>,
    /// New due date
    pub due: Option<DateTime<Utc>>,
    /// New assignee
    pub assigned: Option<String>,
    /// Replacement tag list
    pub tags: Option<Vec<String>>,
    /// New progress, 0 to 1
    pub progress: Option<f64>,
}

impl UpdateTask {
    /// Create an UpdateTask command that changes nothing yet
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            column: None,
            due: None,
            assigned: None,
            tags: None,
            progress: None,
        }
    }

    /// Set a new name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a new description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Move the task to a column
    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set a new due date
    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Set a new assignee
    pub fn with_assigned(mut self, assigned: impl Into<String>) -> Self {
        self.assigned = Some(assigned.into());
        self
    }

    /// Replace the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Set the progress
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateTask {
    type Output = Task;

    async fn execute(&self, ctx: &BoardContext) -> Result<Task> {
        ctx.require_initialised()?;
        let id = TaskId::normalise(&self.id);
        let mut task = ctx.load_task(&id).await?;
        let mut index = ctx.load_index().await?;
        if !index.task_indexed(&id) {
            return Err(BoardError::TaskNotIndexed { id: id.to_string() });
        }
        // Validated up front: the rename below moves the task file, and a
        // bad column must not error out after that side effect has landed
        if let Some(column) = &self.column {
            if !index.has_column(column) {
                return Err(BoardError::column_not_found(column));
            }
        }

        let mut current_id = id.clone();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(BoardError::BlankName);
            }
            let new_id = TaskId::from_name(name);
            if new_id != current_id {
                if ctx.store().task_exists(&new_id).await || index.task_indexed(&new_id) {
                    return Err(BoardError::DuplicateTaskId {
                        id: new_id.to_string(),
                    });
                }
                ctx.store().rename_task_file(&current_id, &new_id).await?;
                index.rename_task(&current_id, new_id.clone());
                current_id = new_id;
            }
            task.rename(name);
        }

        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due) = self.due {
            task.metadata.due = Some(due);
        }
        if let Some(assigned) = &self.assigned {
            task.metadata.assigned = Some(assigned.clone());
        }
        if let Some(tags) = &self.tags {
            task.metadata.tags = tags.clone();
        }
        if let Some(progress) = self.progress {
            task.metadata.progress = Some(progress);
        }

        let now = Utc::now();
        task.metadata.updated = Some(now);

        if let Some(column) = &self.column {
            if index.find_task_column(&current_id) != Some(column.as_str()) {
                index.move_task(&current_id, column, None, false)?;
                index.update_column_linked_fields(&mut task, column, now);
            }
        }

        ctx.store().save_task(&current_id, &task).await?;
        ctx.save_index(&mut index, false).await?;
        tracing::debug!(id = %current_id, "updated task");
        Ok(task)
    }
}

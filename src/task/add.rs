//! CreateTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Create a new task on the board
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// The task name (required, non-blank)
    pub name: String,
    /// Detailed task description
    pub description: Option<String>,
    /// Target column; defaults to the first column
    pub column: Option<String>,
    /// Due date
    pub due: Option<DateTime<Utc>>,
    /// Assignee
    pub assigned: Option<String>,
    /// Tags to apply
    pub tags: Vec<String>,
    /// Initial progress, 0 to 1
    pub progress: Option<f64>,
    /// Write the task file without adding it to the index
    pub untracked: bool,
}

impl CreateTask {
    /// Create a new CreateTask command with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            column: None,
            due: None,
            assigned: None,
            tags: Vec::new(),
            progress: None,
            untracked: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the target column
    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set the due date
    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Set the assignee
    pub fn with_assigned(mut self, assigned: impl Into<String>) -> Self {
        self.assigned = Some(assigned.into());
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the initial progress
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Write the file only, leaving the task untracked
    pub fn untracked(mut self) -> Self {
        self.untracked = true;
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for CreateTask {
    type Output = TaskId;

    async fn execute(&self, ctx: &BoardContext) -> Result<TaskId> {
        ctx.require_initialised()?;
        if self.name.trim().is_empty() {
            return Err(BoardError::BlankName);
        }

        let mut index = ctx.load_index().await?;
        let column = match &self.column {
            Some(column) => {
                if !index.has_column(column) {
                    return Err(BoardError::column_not_found(column));
                }
                column.clone()
            }
            None => index
                .columns
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| BoardError::column_not_found("(first column)"))?,
        };

        let mut task = Task::new(&self.name);
        if ctx.store().task_exists(&task.id).await {
            return Err(BoardError::DuplicateTaskId {
                id: task.id.to_string(),
            });
        }
        if index.task_indexed(&task.id) {
            return Err(BoardError::TaskAlreadyIndexed {
                id: task.id.to_string(),
            });
        }

        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        task.metadata.due = self.due;
        task.metadata.assigned = self.assigned.clone();
        task.metadata.tags = self.tags.clone();
        task.metadata.progress = self.progress;

        let now = Utc::now();
        task.metadata.created = Some(now);
        task.metadata.updated = Some(now);
        if !self.untracked {
            index.update_column_linked_fields(&mut task, &column, now);
        }

        ctx.store().save_task(&task.id, &task).await?;
        if !self.untracked {
            index.add_task(task.id.clone(), &column, None)?;
            ctx.save_index(&mut index, false).await?;
        }

        tracing::debug!(id = %task.id, column, "created task");
        Ok(task.id)
    }
}

//! MoveTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::TaskId;
use async_trait::async_trait;
use chrono::Utc;

/// Move a task to a column, optionally at a position.
///
/// An absolute position is clamped to the column; a relative position is
/// an offset from the task's current position when moving within its own
/// column, and from the top otherwise.
#[derive(Debug, Clone)]
pub struct MoveTask {
    /// The task id to move
    pub id: String,
    /// The target column
    pub column: String,
    /// Requested position; appends when absent
    pub position: Option<i64>,
    /// Interpret the position as an offset
    pub relative: bool,
}

impl MoveTask {
    /// Move a task to the end of a column
    pub fn new(id: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            position: None,
            relative: false,
        }
    }

    /// Set an absolute position
    pub fn at_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self.relative = false;
        self
    }

    /// Set a position relative to the task's current one
    pub fn by_offset(mut self, offset: i64) -> Self {
        self.position = Some(offset);
        self.relative = true;
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveTask {
    type Output = TaskId;

    async fn execute(&self, ctx: &BoardContext) -> Result<TaskId> {
        ctx.require_initialised()?;
        let id = TaskId::normalise(&self.id);
        let mut task = ctx.load_task(&id).await?;
        let mut index = ctx.load_index().await?;

        index.move_task(&id, &self.column, self.position, self.relative)?;

        let now = Utc::now();
        task.metadata.updated = Some(now);
        index.update_column_linked_fields(&mut task, &self.column, now);

        ctx.store().save_task(&id, &task).await?;
        ctx.save_index(&mut index, false).await?;
        tracing::debug!(id = %id, column = %self.column, "moved task");
        Ok(id)
    }
}

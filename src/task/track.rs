//! TrackTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::TaskId;
use async_trait::async_trait;
use chrono::Utc;

/// Add an untracked task file to the index
#[derive(Debug, Clone)]
pub struct TrackTask {
    /// The task id to track
    pub id: String,
    /// The column to add it to
    pub column: String,
}

impl TrackTask {
    /// Create a new TrackTask command
    pub fn new(id: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for TrackTask {
    type Output = TaskId;

    async fn execute(&self, ctx: &BoardContext) -> Result<TaskId> {
        ctx.require_initialised()?;
        let id = TaskId::normalise(&self.id);
        let mut task = ctx.load_task(&id).await?;
        let mut index = ctx.load_index().await?;

        index.add_task(id.clone(), &self.column, None)?;
        index.update_column_linked_fields(&mut task, &self.column, Utc::now());

        ctx.store().save_task(&id, &task).await?;
        ctx.save_index(&mut index, false).await?;
        tracing::debug!(id = %id, column = %self.column, "tracked task");
        Ok(id)
    }
}

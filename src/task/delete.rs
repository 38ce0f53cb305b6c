//! DeleteTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::TaskId;
use async_trait::async_trait;

/// Remove a task from the index, optionally deleting its file too
#[derive(Debug, Clone)]
pub struct DeleteTask {
    /// The task id to delete
    pub id: String,
    /// Also delete the task file
    pub remove_file: bool,
}

impl DeleteTask {
    /// Remove the task from the index, leaving the file untracked
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            remove_file: false,
        }
    }

    /// Delete the task file as well
    pub fn with_file(mut self) -> Self {
        self.remove_file = true;
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteTask {
    type Output = TaskId;

    async fn execute(&self, ctx: &BoardContext) -> Result<TaskId> {
        ctx.require_initialised()?;
        let id = TaskId::normalise(&self.id);
        let mut index = ctx.load_index().await?;
        if !index.task_indexed(&id) {
            return Err(BoardError::TaskNotIndexed { id: id.to_string() });
        }

        index.remove_task(&id);
        ctx.save_index(&mut index, false).await?;
        if self.remove_file {
            ctx.store().delete_task_file(&id).await?;
        }
        tracing::debug!(id = %id, remove_file = self.remove_file, "deleted task");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::CreateTask;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext) {
        let temp = TempDir::new().unwrap();
        let ctx = BoardContext::open(temp.path().join(".taskboard"));
        InitBoard::new("Test").execute(&ctx).await.unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_delete_keeps_file_by_default() {
        let (_temp, ctx) = setup().await;
        let id = CreateTask::new("Work").execute(&ctx).await.unwrap();

        DeleteTask::new(id.as_str()).execute(&ctx).await.unwrap();

        let index = ctx.load_index().await.unwrap();
        assert!(!index.task_indexed(&id));
        assert!(ctx.store().task_exists(&id).await);
    }

    #[tokio::test]
    async fn test_delete_with_file() {
        let (_temp, ctx) = setup().await;
        let id = CreateTask::new("Work").execute(&ctx).await.unwrap();

        DeleteTask::new(id.as_str())
            .with_file()
            .execute(&ctx)
            .await
            .unwrap();
        assert!(!ctx.store().task_exists(&id).await);
    }

    #[tokio::test]
    async fn test_delete_untracked_task_fails() {
        let (_temp, ctx) = setup().await;
        let result = DeleteTask::new("ghost").execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::TaskNotIndexed { .. })));
    }
}

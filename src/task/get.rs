//! GetTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::{Task, TaskId};
use async_trait::async_trait;

/// Load one task by id
#[derive(Debug, Clone)]
pub struct GetTask {
    /// The task id; a trailing `.md` is tolerated
    pub id: String,
}

impl GetTask {
    /// Create a new GetTask command
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetTask {
    type Output = Task;

    async fn execute(&self, ctx: &BoardContext) -> Result<Task> {
        ctx.require_initialised()?;
        let id = TaskId::normalise(&self.id);
        ctx.load_task(&id).await
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
    async fn test_get_task() {
        let (_temp, ctx) = setup().await;
        CreateTask::new("My Task").execute(&ctx).await.unwrap();

        let task = GetTask::new("my-task").execute(&ctx).await.unwrap();
        assert_eq!(task.name, "My Task");
        assert_eq!(task.id.as_str(), "my-task");
    }

    #[tokio::test]
    async fn test_get_task_normalises_id() {
        let (_temp, ctx) = setup().await;
        CreateTask::new("My Task").execute(&ctx).await.unwrap();

        let task = GetTask::new(" my-task.md ").execute(&ctx).await.unwrap();
        assert_eq!(task.id.as_str(), "my-task");
    }

    #[tokio::test]
    async fn test_get_missing_task() {
        let (_temp, ctx) = setup().await;
        let result = GetTask::new("nope").execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::TaskFileNotFound { .. })));
    }
}

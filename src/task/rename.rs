//! RenameTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::TaskId;
use async_trait::async_trait;
use chrono::Utc;

/// Rename a task. The id is derived from the name, so the task file and
/// index entry move with it.
#[derive(Debug, Clone)]
pub struct RenameTask {
    /// The task id to rename
    pub id: String,
    /// The new name
    pub new_name: String,
}

impl RenameTask {
    /// Create a new RenameTask command
    pub fn new(id: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            new_name: new_name.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for RenameTask {
    type Output = TaskId;

    async fn execute(&self, ctx: &BoardContext) -> Result<TaskId> {
        ctx.require_initialised()?;
        if self.new_name.trim().is_empty() {
            return Err(BoardError::BlankName);
        }

        let id = TaskId::normalise(&self.id);
        let mut task = ctx.load_task(&id).await?;
        let mut index = ctx.load_index().await?;
        if !index.task_indexed(&id) {
            return Err(BoardError::TaskNotIndexed { id: id.to_string() });
        }

        let new_id = TaskId::from_name(&self.new_name);
        if new_id != id {
            if ctx.store().task_exists(&new_id).await || index.task_indexed(&new_id) {
                return Err(BoardError::DuplicateTaskId {
                    id: new_id.to_string(),
                });
            }
            ctx.store().rename_task_file(&id, &new_id).await?;
            index.rename_task(&id, new_id.clone());
        }

        task.rename(&self.new_name);
        task.metadata.updated = Some(Utc::now());
        ctx.store().save_task(&new_id, &task).await?;
        ctx.save_index(&mut index, false).await?;
        tracing::debug!(from = %id, to = %new_id, "renamed task");
        Ok(new_id)
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
    async fn test_rename_task() {
        let (_temp, ctx) = setup().await;
        let b = CreateTask::new("Before").execute(&ctx).await.unwrap();
        CreateTask::new("Other").execute(&ctx).await.unwrap();

        let after = RenameTask::new(b.as_str(), "After")
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(after.as_str(), "after");

        let task = ctx.load_task(&after).await.unwrap();
        assert_eq!(task.name, "After");
        assert!(!ctx.store().task_exists(&b).await);

        // The index entry keeps its position
        let index = ctx.load_index().await.unwrap();
        let ids: Vec<_> = index.columns["Backlog"].iter().map(TaskId::as_str).collect();
        assert_eq!(ids, vec!["after", "other"]);
    }

    #[tokio::test]
    async fn test_rename_collision() {
        let (_temp, ctx) = setup().await;
        CreateTask::new("Taken").execute(&ctx).await.unwrap();
        let id = CreateTask::new("Work").execute(&ctx).await.unwrap();

        let result = RenameTask::new(id.as_str(), "Taken").execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::DuplicateTaskId { .. })));
    }

    #[tokio::test]
    async fn test_rename_same_slug_updates_name() {
        let (_temp, ctx) = setup().await;
        let id = CreateTask::new("my task").execute(&ctx).await.unwrap();

        let renamed = RenameTask::new(id.as_str(), "My Task")
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(renamed, id);
        assert_eq!(ctx.load_task(&id).await.unwrap().name, "My Task");
    }

    #[tokio::test]
    async fn test_rename_blank_name() {
        let (_temp, ctx) = setup().await;
        let id = CreateTask::new("Work").execute(&ctx).await.unwrap();
        let result = RenameTask::new(id.as_str(), "  ").execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::BlankName)));
    }
}

//! In-memory task store for tests

use super::TaskStore;
use crate::error::{BoardError, Result};
use crate::types::{Index, Options, Task, TaskId};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// A `TaskStore` that keeps everything in memory.
///
/// Used by engine and orchestration tests that don't care about the
/// filesystem; behaves like `FileTaskStore` including the config-over-index
/// options merge on load.
#[derive(Default)]
pub struct MemoryTaskStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    index: Option<Index>,
    tasks: IndexMap<TaskId, Task>,
    config: Option<Options>,
}

impl MemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with an index
    pub fn with_index(index: Index) -> Self {
        let store = Self::new();
        store.inner.lock().expect("store lock").index = Some(index);
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store lock")
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    fn initialised(&self) -> bool {
        self.lock().index.is_some()
    }

    fn board_path(&self) -> PathBuf {
        PathBuf::from(":memory:")
    }

    fn task_folder_path(&self) -> PathBuf {
        PathBuf::from(":memory:/tasks")
    }

    async fn initialise(&self) -> Result<()> {
        Ok(())
    }

    async fn load_index(&self) -> Result<Index> {
        let inner = self.lock();
        let mut index = inner.index.clone().ok_or(BoardError::NotInitialised {
            path: self.board_path(),
        })?;
        if let Some(config) = &inner.config {
            index.options = config.clone();
        }
        Ok(index)
    }

    async fn save_index(&self, index: &Index) -> Result<()> {
        self.lock().index = Some(index.clone());
        Ok(())
    }

    async fn load_task(&self, id: &TaskId) -> Result<Task> {
        let mut task = self
            .lock()
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| BoardError::task_file_not_found(id.as_str()))?;
        task.id = id.clone();
        Ok(task)
    }

    async fn save_task(&self, id: &TaskId, task: &Task) -> Result<()> {
        self.lock().tasks.insert(id.clone(), task.clone());
        Ok(())
    }

    async fn task_exists(&self, id: &TaskId) -> bool {
        self.lock().tasks.contains_key(id)
    }

    async fn rename_task_file(&self, old: &TaskId, new: &TaskId) -> Result<()> {
        let mut inner = self.lock();
        let task = inner
            .tasks
            .shift_remove(old)
            .ok_or_else(|| BoardError::task_file_not_found(old.as_str()))?;
        inner.tasks.insert(new.clone(), task);
        Ok(())
    }

    async fn delete_task_file(&self, id: &TaskId) -> Result<()> {
        self.lock().tasks.shift_remove(id);
        Ok(())
    }

    async fn list_task_ids(&self) -> Result<Vec<TaskId>> {
        Ok(self.lock().tasks.keys().cloned().collect())
    }

    fn config_exists(&self) -> bool {
        self.lock().config.is_some()
    }

    async fn load_config(&self) -> Result<Option<Options>> {
        Ok(self.lock().config.clone())
    }

    async fn save_config(&self, options: &Options) -> Result<()> {
        self.lock().config = Some(options.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trips() {
        let store = MemoryTaskStore::new();
        assert!(!store.initialised());

        store
            .save_index(&Index::new("Test", &["Todo"]))
            .await
            .unwrap();
        assert!(store.initialised());

        let task = Task::new("Work");
        store.save_task(&task.id, &task).await.unwrap();
        assert!(store.task_exists(&task.id).await);
        assert_eq!(store.load_task(&task.id).await.unwrap().name, "Work");
    }

    #[tokio::test]
    async fn test_config_merge_matches_file_store() {
        let store = MemoryTaskStore::with_index(Index::new("Test", &["Todo"]));
        let mut options = Options::default();
        options.default_task_workload = 9.0;
        store.save_config(&options).await.unwrap();

        let index = store.load_index().await.unwrap();
        assert_eq!(index.options.default_task_workload, 9.0);
    }
}

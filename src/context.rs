//! BoardContext - storage access passed to every command
//!
//! The context wraps the injected task store and provides the hydration
//! helpers commands share. The one piece of logic living here is the index
//! save orchestration: configured column sorts are applied before the
//! document is written, and options are mirrored to the config store.

use crate::error::{BoardError, Result};
use crate::sort;
use crate::store::{FileTaskStore, TaskStore};
use crate::types::{Index, Task, TaskId, TaskSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Context passed to every command
#[derive(Clone)]
pub struct BoardContext {
    store: Arc<dyn TaskStore>,
}

impl BoardContext {
    /// Create a context over any store implementation
    pub fn new(store: impl TaskStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a context over a file store at the given `.taskboard` directory
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(FileTaskStore::new(root))
    }

    /// The underlying store
    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    /// Fail with `NotInitialised` unless a board exists
    pub fn require_initialised(&self) -> Result<()> {
        if self.store.initialised() {
            Ok(())
        } else {
            Err(BoardError::NotInitialised {
                path: self.store.board_path(),
            })
        }
    }

    /// Load the index (config options merged by the store)
    pub async fn load_index(&self) -> Result<Index> {
        self.store.load_index().await
    }

    /// Load one task, verifying its file exists first
    pub async fn load_task(&self, id: &TaskId) -> Result<Task> {
        if !self.store.task_exists(id).await {
            return Err(BoardError::task_file_not_found(id.as_str()));
        }
        self.store.load_task(id).await
    }

    /// Load every tracked task, in index order
    pub async fn load_tracked_tasks(&self, index: &Index) -> Result<TaskSet> {
        let mut tasks = TaskSet::new();
        for ids in index.columns.values() {
            for id in ids {
                tasks.insert(self.store.load_task(id).await?);
            }
        }
        Ok(tasks)
    }

    /// Ids of task files that exist but aren't tracked by the index
    pub async fn untracked_task_ids(&self, index: &Index) -> Result<Vec<TaskId>> {
        let mut untracked = self.store.list_task_ids().await?;
        untracked.retain(|id| !index.task_indexed(id));
        Ok(untracked)
    }

    /// Persist the index, re-sorting every column with configured sorting
    /// first and mirroring options to the config store.
    ///
    /// Per-column failures (unknown column, unloadable task, bad sorter
    /// pattern) are logged and that column is skipped; the save proceeds
    /// for the rest.
    pub async fn save_index(&self, index: &mut Index, ignore_options: bool) -> Result<()> {
        let sorting = index.options.column_sorting.clone();
        for (column, sorters) in &sorting {
            if !index.has_column(column) {
                tracing::warn!(column, "configured sorting references a missing column");
                continue;
            }

            let hydrated = self.load_column_tasks(index, column).await;
            let result = match hydrated {
                Ok(tasks) => sort::sort_column_in_index(index, &tasks, column, sorters),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!(column, error = %e, "couldn't sort column, leaving its order");
            }
        }

        if !ignore_options && self.store.config_exists() {
            self.store.save_config(&index.options).await?;
        }
        self.store.save_index(index).await
    }

    async fn load_column_tasks(&self, index: &Index, column: &str) -> Result<TaskSet> {
        let mut tasks = TaskSet::new();
        if let Some(ids) = index.columns.get(column) {
            for id in ids {
                tasks.insert(self.store.load_task(id).await?);
            }
        }
        Ok(tasks)
    }
}

//! Task storage - the injected persistence seam
//!
//! Commands never touch the filesystem directly; they go through the
//! [`TaskStore`] trait. The real implementation is [`FileTaskStore`], a
//! `.taskboard` directory of JSON documents; tests inject
//! [`MemoryTaskStore`] instead.

mod memory;

pub use memory::MemoryTaskStore;

use crate::error::{BoardError, Result};
use crate::types::{Index, Options, Task, TaskId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Async persistence for the index document, per-task documents, and the
/// separately-persisted options
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether a board exists in this store
    fn initialised(&self) -> bool;

    /// The board's root location (used in error messages)
    fn board_path(&self) -> PathBuf;

    /// Where task documents live
    fn task_folder_path(&self) -> PathBuf;

    /// Create the storage structure for a new board (idempotent)
    async fn initialise(&self) -> Result<()>;

    /// Load the index document. A present config document's options are
    /// merged over the index's own options.
    async fn load_index(&self) -> Result<Index>;

    /// Write the index document (whole-document replace)
    async fn save_index(&self, index: &Index) -> Result<()>;

    /// Load one task document, with its id injected
    async fn load_task(&self, id: &TaskId) -> Result<Task>;

    /// Write one task document
    async fn save_task(&self, id: &TaskId, task: &Task) -> Result<()>;

    /// Whether a task document exists
    async fn task_exists(&self, id: &TaskId) -> bool;

    /// Move a task document to a new id
    async fn rename_task_file(&self, old: &TaskId, new: &TaskId) -> Result<()>;

    /// Delete a task document
    async fn delete_task_file(&self, id: &TaskId) -> Result<()>;

    /// Ids of every task document in the store, tracked or not
    async fn list_task_ids(&self) -> Result<Vec<TaskId>>;

    /// Whether a separate config document exists
    fn config_exists(&self) -> bool;

    /// Load the separately-persisted options, if any
    async fn load_config(&self) -> Result<Option<Options>>;

    /// Persist options to the config document
    async fn save_config(&self, options: &Options) -> Result<()>;
}

/// File-backed store over a `.taskboard` directory:
///
/// ```text
/// .taskboard/
/// ├── index.json       # columns, task-id order, options
/// ├── config.json      # separately-persisted options (optional)
/// └── tasks/
///     └── {id}.json    # one document per task
/// ```
pub struct FileTaskStore {
    root: PathBuf,
}

impl FileTaskStore {
    /// Create a store for the given `.taskboard` directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path to index.json
    pub fn index_path(&self) -> PathBuf {
        self.root.join("index.json")
    }

    /// Path to config.json
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Path to a task's JSON file
    pub fn task_path(&self, id: &TaskId) -> PathBuf {
        self.root.join("tasks").join(format!("{}.json", id))
    }
}

#[async_trait]
impl TaskStore for FileTaskStore {
    fn initialised(&self) -> bool {
        self.index_path().exists()
    }

    fn board_path(&self) -> PathBuf {
        self.root.clone()
    }

    fn task_folder_path(&self) -> PathBuf {
        self.root.join("tasks")
    }

    async fn initialise(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.task_folder_path()).await?;
        Ok(())
    }

    async fn load_index(&self) -> Result<Index> {
        let path = self.index_path();
        if !path.exists() {
            return Err(BoardError::NotInitialised {
                path: self.root.clone(),
            });
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| BoardError::IndexRead { source })?;
        let mut index: Index = serde_json::from_str(&content)
            .map_err(|e| BoardError::index_parse(e.to_string()))?;

        if let Some(options) = self.load_config().await? {
            index.options = options;
        }
        Ok(index)
    }

    async fn save_index(&self, index: &Index) -> Result<()> {
        let content = serde_json::to_string_pretty(index)?;
        atomic_write(&self.index_path(), content.as_bytes()).await
    }

    async fn load_task(&self, id: &TaskId) -> Result<Task> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(BoardError::task_file_not_found(id.as_str()));
        }

        let content = fs::read_to_string(&path).await.map_err(|source| {
            BoardError::TaskRead {
                id: id.to_string(),
                source,
            }
        })?;
        let mut task: Task = serde_json::from_str(&content)
            .map_err(|e| BoardError::task_parse(id.as_str(), e.to_string()))?;
        task.id = id.clone();
        Ok(task)
    }

    async fn save_task(&self, id: &TaskId, task: &Task) -> Result<()> {
        let content = serde_json::to_string_pretty(task)?;
        atomic_write(&self.task_path(id), content.as_bytes()).await
    }

    async fn task_exists(&self, id: &TaskId) -> bool {
        self.task_path(id).exists()
    }

    async fn rename_task_file(&self, old: &TaskId, new: &TaskId) -> Result<()> {
        fs::rename(self.task_path(old), self.task_path(new)).await?;
        Ok(())
    }

    async fn delete_task_file(&self, id: &TaskId) -> Result<()> {
        let path = self.task_path(id);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn list_task_ids(&self) -> Result<Vec<TaskId>> {
        let dir = self.task_folder_path();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(TaskId::from_string(stem));
                }
            }
        }
        Ok(ids)
    }

    fn config_exists(&self) -> bool {
        self.config_path().exists()
    }

    async fn load_config(&self) -> Result<Option<Options>> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| BoardError::IndexRead { source })?;
        let options: Options = serde_json::from_str(&content)
            .map_err(|e| BoardError::index_parse(e.to_string()))?;
        Ok(Some(options))
    }

    async fn save_config(&self, options: &Options) -> Result<()> {
        let content = serde_json::to_string_pretty(options)?;
        atomic_write(&self.config_path(), content.as_bytes()).await
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}

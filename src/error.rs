//! Error types for the board engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Board not initialised at the given path
    #[error("board not initialised at {path}")]
    NotInitialised { path: PathBuf },

    /// Board already exists
    #[error("board already initialised at {path}")]
    AlreadyInitialised { path: PathBuf },

    /// No task file exists for the given id
    #[error("no task file found with id {id}")]
    TaskFileNotFound { id: String },

    /// Column not found in the index
    #[error("column not found: {name}")]
    ColumnNotFound { name: String },

    /// Task id is already present in the index
    #[error("task {id} is already in the index")]
    TaskAlreadyIndexed { id: String },

    /// Task id is not present in the index
    #[error("task {id} is not in the index")]
    TaskNotIndexed { id: String },

    /// Rename would collide with an existing task
    #[error("a task with id {id} already exists")]
    DuplicateTaskId { id: String },

    /// Task name is empty or whitespace
    #[error("task name cannot be blank")]
    BlankName,

    /// Sprint selector did not match any configured sprint
    #[error("sprint not found: {message}")]
    SprintNotFound { message: String },

    /// Invalid parameter value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Index file could not be read
    #[error("couldn't access index file: {source}")]
    IndexRead { source: std::io::Error },

    /// Index file could not be parsed
    #[error("unable to parse index: {message}")]
    IndexParse { message: String },

    /// Task file could not be read
    #[error("couldn't access task file {id}: {source}")]
    TaskRead { id: String, source: std::io::Error },

    /// Task file could not be parsed
    #[error("unable to parse task {id}: {message}")]
    TaskParse { id: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a column-not-found error
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create a task-file-not-found error
    pub fn task_file_not_found(id: impl Into<String>) -> Self {
        Self::TaskFileNotFound { id: id.into() }
    }

    /// Create a sprint-not-found error
    pub fn sprint_not_found(message: impl Into<String>) -> Self {
        Self::SprintNotFound {
            message: message.into(),
        }
    }

    /// Create an index parse error
    pub fn index_parse(message: impl Into<String>) -> Self {
        Self::IndexParse {
            message: message.into(),
        }
    }

    /// Create a task parse error
    pub fn task_parse(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskParse {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

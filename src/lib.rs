//! Task board engine with file-backed storage
//!
//! This crate keeps a kanban-style board as a directory of JSON documents:
//! one index holding the column structure and task ordering, and one
//! document per task. On top of that sit stateless engines for filtering,
//! sorting, and workload analytics, driven by per-operation commands.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use taskboard::{board::InitBoard, task::CreateTask, BoardContext, Execute};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BoardContext::open("/path/to/repo/.taskboard");
//! InitBoard::new("My Project").execute(&ctx).await?;
//!
//! let id = CreateTask::new("Implement feature X")
//!     .with_description("Add the new feature")
//!     .execute(&ctx)
//!     .await?;
//!
//! println!("Created task: {id}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! repo/
//! └── .taskboard/
//!     ├── index.json       # Columns, ordered task ids, board options
//!     ├── config.json      # Separately-persisted options (optional)
//!     └── tasks/
//!         └── {id}.json    # One document per task
//! ```
//!
//! The index holds ordering and membership; task documents hold everything
//! else. A task id appears in at most one column, and the id is the file
//! name rather than part of the document.

mod context;
mod error;
mod operation;

pub mod field;
pub mod filter;
pub mod sort;
pub mod store;
pub mod types;
pub mod workload;

// Command modules
pub mod board;
pub mod task;

pub use context::BoardContext;
pub use error::{BoardError, Result};
pub use operation::Execute;
pub use store::{FileTaskStore, MemoryTaskStore, TaskStore};

// Re-export commonly used types
pub use types::{
    CustomField, CustomFieldType, CustomValue, DateField, FilterSpec, FilterValue, Index, Options,
    SortOrder, Sorter, Sprint, Task, TaskId, TaskSet, UpdatePolicy,
};

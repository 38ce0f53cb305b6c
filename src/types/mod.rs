//! Core types for the board engine

mod filter;
mod ids;
mod index;
mod task;

// Re-export all types
pub use filter::{FilterSpec, FilterValue};
pub use ids::TaskId;
pub use index::{
    default_workload_tags, CustomField, CustomFieldType, Index, Options, SortOrder, Sorter,
    Sprint, UpdatePolicy,
};
pub use task::{Comment, CustomValue, DateField, Metadata, Relation, SubTask, Task, TaskSet};

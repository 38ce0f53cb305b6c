//! SearchTasks command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::filter::filter_tasks;
use crate::operation::Execute;
use crate::types::{FilterSpec, FilterValue, Task, TaskId};
use async_trait::async_trait;
use serde::Serialize;

/// Search tracked tasks with the filter engine.
///
/// Every filter must match for a task to be returned. With `quiet` only
/// the ids come back; otherwise each hit carries the hydrated task and
/// its column.
#[derive(Debug, Clone, Default)]
pub struct SearchTasks {
    /// Field name to filter value
    pub filters: FilterSpec,
    /// Return bare ids instead of hydrated tasks
    pub quiet: bool,
}

/// One hydrated search hit
#[derive(Debug, Clone, Serialize)]
pub struct FoundTask {
    pub column: String,
    pub task: Task,
}

/// Search output, shaped by the `quiet` flag
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Ids(Vec<TaskId>),
    Tasks(Vec<FoundTask>),
}

impl SearchTasks {
    /// Create a search with no filters (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter
    pub fn with_filter(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.filters.insert(field.into(), value);
        self
    }

    /// Return bare ids
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for SearchTasks {
    type Output = SearchResults;

    async fn execute(&self, ctx: &BoardContext) -> Result<SearchResults> {
        ctx.require_initialised()?;
        let index = ctx.load_index().await?;
        let tasks = ctx.load_tracked_tasks(&index).await?;

        let ids = filter_tasks(&index, &tasks, &self.filters);
        if self.quiet {
            return Ok(SearchResults::Ids(ids));
        }

        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            let column = index
                .find_task_column(&id)
                .map(str::to_string)
                .unwrap_or_default();
            let task = tasks
                .get(&id)
                .cloned()
                .ok_or_else(|| BoardError::task_file_not_found(id.as_str()))?;
            found.push(FoundTask { column, task });
        }
        Ok(SearchResults::Tasks(found))
    }
}

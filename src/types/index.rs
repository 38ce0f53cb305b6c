//! The index document: columns, ordered task-id lists, and board options
//!
//! The index is the single source of truth for which tasks are tracked and
//! in what order. Every mutation goes through the primitives here, which
//! maintain the one invariant that matters: a task id appears in at most
//! one column's list at any time.

use super::ids::TaskId;
use super::task::{DateField, Task};
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The board index: name, description, ordered columns, options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Column name -> ordered task ids. Column order is insertion order.
    #[serde(default)]
    pub columns: IndexMap<String, Vec<TaskId>>,
    #[serde(default)]
    pub options: Options,
}

impl Index {
    /// Create a new index with the given columns and default options
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            columns: columns
                .iter()
                .map(|c| (c.to_string(), Vec::new()))
                .collect(),
            options: Options::default(),
        }
    }

    /// The default columns for a new board
    pub fn default_columns() -> &'static [&'static str] {
        &["Backlog", "Todo", "In Progress", "Done"]
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check whether a column exists
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Check whether a task id is tracked anywhere in the index
    pub fn task_indexed(&self, id: &TaskId) -> bool {
        self.find_task_column(id).is_some()
    }

    /// Total number of tracked tasks
    pub fn task_count(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// First column (in iteration order) whose list contains the id
    pub fn find_task_column(&self, id: &TaskId) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, ids)| ids.contains(id))
            .map(|(name, _)| name.as_str())
    }

    /// Add a task id to a column.
    ///
    /// `position` omitted or past the end appends; otherwise the id is
    /// inserted at that position. Fails if the column doesn't exist or the
    /// id is already tracked.
    pub fn add_task(&mut self, id: TaskId, column: &str, position: Option<usize>) -> Result<()> {
        if !self.has_column(column) {
            return Err(BoardError::column_not_found(column));
        }
        if self.task_indexed(&id) {
            return Err(BoardError::TaskAlreadyIndexed { id: id.to_string() });
        }
        self.insert_task_id(id, column, position);
        Ok(())
    }

    /// Remove a task id from whichever column contains it
    pub fn remove_task(&mut self, id: &TaskId) {
        for ids in self.columns.values_mut() {
            ids.retain(|t| t != id);
        }
    }

    /// Replace a task id in place, preserving its position
    pub fn rename_task(&mut self, old: &TaskId, new: TaskId) {
        for ids in self.columns.values_mut() {
            for slot in ids.iter_mut() {
                if slot == old {
                    *slot = new.clone();
                }
            }
        }
    }

    /// Move a task id to a column/position.
    ///
    /// With `relative` set, the position is an offset: from the task's
    /// current position when the target is its own column, from 0 when it
    /// is another column. The result is clamped against the target column
    /// as it stands before the task is removed, and the insert happens into
    /// the list after removal. For certain forward moves within the same
    /// column this lands the task one slot earlier than the raw position
    /// suggests; that behavior is deliberate and pinned by tests.
    pub fn move_task(
        &mut self,
        id: &TaskId,
        column: &str,
        position: Option<i64>,
        relative: bool,
    ) -> Result<()> {
        let current = self
            .find_task_column(id)
            .ok_or_else(|| BoardError::TaskNotIndexed { id: id.to_string() })?
            .to_string();
        let target = self
            .columns
            .get(column)
            .ok_or_else(|| BoardError::column_not_found(column))?;

        let resolved = match position {
            Some(mut pos) => {
                if relative {
                    let base = if current == column {
                        self.columns[&current]
                            .iter()
                            .position(|t| t == id)
                            .unwrap_or(0) as i64
                    } else {
                        0
                    };
                    pos += base;
                }
                // Clamp against the pre-removal target list
                Some(pos.clamp(0, target.len() as i64) as usize)
            }
            None => None,
        };

        let id = id.clone();
        self.remove_task(&id);
        self.insert_task_id(id, column, resolved);
        Ok(())
    }

    /// Apply column-linked auto-timestamping for a task landing in `column`.
    ///
    /// `started` and `completed` stamp once (only when unset); date-typed
    /// custom fields follow their declared update policy.
    pub fn update_column_linked_fields(&self, task: &mut Task, column: &str, now: DateTime<Utc>) {
        for field in [DateField::Started, DateField::Completed] {
            if self.options.column_list(field.name()).is_some_and(|cols| {
                cols.iter().any(|c| c == column)
            }) && task.metadata.date(field).is_none()
            {
                task.metadata.set_date(field, now);
            }
        }

        for custom in &self.options.custom_fields {
            if custom.field_type != CustomFieldType::Date {
                continue;
            }
            let linked = self
                .options
                .column_list(&custom.name)
                .is_some_and(|cols| cols.iter().any(|c| c == column));
            if !linked {
                continue;
            }
            let unset = !task.metadata.custom.contains_key(&custom.name);
            let update = match custom.update_date {
                UpdatePolicy::Always => true,
                UpdatePolicy::Once => unset,
                UpdatePolicy::None => false,
            };
            if update {
                task.metadata
                    .custom
                    .insert(custom.name.clone(), super::task::CustomValue::Date(now));
            }
        }
    }

    /// Unconditional insert used after the membership checks have passed.
    /// The position is re-clamped against the list as it stands now.
    fn insert_task_id(&mut self, id: TaskId, column: &str, position: Option<usize>) {
        let ids = self
            .columns
            .get_mut(column)
            .expect("caller validated the column");
        match position {
            Some(pos) if pos < ids.len() => ids.insert(pos, id),
            _ => ids.push(id),
        }
    }
}

/// Board-wide options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub custom_fields: Vec<CustomField>,
    /// Ordered; the last entry is the current sprint
    pub sprints: Vec<Sprint>,
    pub completed_columns: Vec<String>,
    pub started_columns: Vec<String>,
    pub column_sorting: IndexMap<String, Vec<Sorter>>,
    pub default_task_workload: f64,
    pub task_workload_tags: IndexMap<String, f64>,
    /// Column lists that auto-stamp date-typed custom fields, keyed by
    /// field name (the typed rendition of per-field "<field>Columns" keys)
    pub custom_field_columns: IndexMap<String, Vec<String>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            custom_fields: Vec::new(),
            sprints: Vec::new(),
            completed_columns: Vec::new(),
            started_columns: Vec::new(),
            column_sorting: IndexMap::new(),
            default_task_workload: 2.0,
            task_workload_tags: default_workload_tags(),
            custom_field_columns: IndexMap::new(),
        }
    }
}

impl Options {
    /// The column list linked to a field, if any.
    ///
    /// `started` and `completed` resolve to their dedicated lists; every
    /// other name goes through `custom_field_columns`.
    pub fn column_list(&self, field: &str) -> Option<&[String]> {
        match field {
            "started" => Some(&self.started_columns),
            "completed" => Some(&self.completed_columns),
            _ => self.custom_field_columns.get(field).map(Vec::as_slice),
        }
    }

    /// Look up a declared custom field by name
    pub fn custom_field(&self, name: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.name == name)
    }

    /// The current sprint (the last declared one)
    pub fn current_sprint(&self) -> Option<&Sprint> {
        self.sprints.last()
    }
}

/// The default tag-name -> workload weight map
pub fn default_workload_tags() -> IndexMap<String, f64> {
    [
        ("Nothing", 0.0),
        ("Tiny", 1.0),
        ("Small", 2.0),
        ("Medium", 3.0),
        ("Large", 5.0),
        ("Huge", 8.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// A user-declared metadata field with an explicit type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    /// Column-linked auto-fill policy (date-typed fields only)
    #[serde(default)]
    pub update_date: UpdatePolicy,
}

/// The type of a custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Boolean,
    Number,
    String,
    Date,
}

/// When a column-linked date field gets stamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    #[default]
    None,
    Once,
    Always,
}

/// A named time window; the end is implied by the next sprint's start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
}

/// One key of a column's configured sort order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorter {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
    /// Optional regex used to extract the sortable part of the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

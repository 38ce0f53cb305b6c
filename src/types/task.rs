//! Task types: Task, Metadata, SubTask, Relation, Comment, TaskSet

use super::ids::TaskId;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A task/card on the board.
///
/// The id is never serialized into the task document - it is the file name,
/// and is injected back after deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(skip)]
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Task {
    /// Create a new task; the id is derived from the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: TaskId::from_name(&name),
            name,
            description: String::new(),
            metadata: Metadata::default(),
            sub_tasks: Vec::new(),
            relations: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.metadata.tags = tags;
        self
    }

    /// Set the due date
    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.metadata.due = Some(due);
        self
    }

    /// Set the assignee
    pub fn with_assigned(mut self, assigned: impl Into<String>) -> Self {
        self.metadata.assigned = Some(assigned.into());
        self
    }

    /// Set the sub-tasks
    pub fn with_sub_tasks(mut self, sub_tasks: Vec<SubTask>) -> Self {
        self.sub_tasks = sub_tasks;
        self
    }

    /// Set the relations
    pub fn with_relations(mut self, relations: Vec<Relation>) -> Self {
        self.relations = relations;
        self
    }

    /// Rename the task, re-deriving the id from the new name
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.id = TaskId::from_name(&self.name);
    }
}

/// Task metadata - the well-known fields plus user-declared custom fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Values for user-declared custom fields, keyed by field name
    #[serde(flatten)]
    pub custom: IndexMap<String, CustomValue>,
}

impl Metadata {
    /// Read one of the well-known date fields
    pub fn date(&self, field: DateField) -> Option<DateTime<Utc>> {
        match field {
            DateField::Created => self.created,
            DateField::Updated => self.updated,
            DateField::Started => self.started,
            DateField::Completed => self.completed,
            DateField::Due => self.due,
        }
    }

    /// Write one of the well-known date fields
    pub fn set_date(&mut self, field: DateField, value: DateTime<Utc>) {
        match field {
            DateField::Created => self.created = Some(value),
            DateField::Updated => self.updated = Some(value),
            DateField::Started => self.started = Some(value),
            DateField::Completed => self.completed = Some(value),
            DateField::Due => self.due = Some(value),
        }
    }
}

/// The well-known date-valued metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Created,
    Updated,
    Started,
    Completed,
    Due,
}

impl DateField {
    /// The metadata key for this field
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Due => "due",
        }
    }
}

/// A value stored under a user-declared custom field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Boolean(bool),
    Number(f64),
    Date(DateTime<Utc>),
    String(String),
}

impl CustomValue {
    /// The value as a date, if it is one
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// A checklist entry on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A typed link from one task to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub task: TaskId,
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// A comment on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub date: DateTime<Utc>,
    pub text: String,
}

/// An insertion-ordered set of tasks keyed by id.
///
/// This is the single normalization boundary for "a collection of tasks":
/// both a plain list and an id-keyed map become a `TaskSet` at ingestion,
/// and every filter/sort/workload entry point takes one. When built from a
/// map, a task missing its id gets it injected from the key.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: IndexMap<TaskId, Task>,
}

impl TaskSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered list of tasks, keyed by each task's own id
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut map = IndexMap::with_capacity(tasks.len());
        for task in tasks {
            map.insert(task.id.clone(), task);
        }
        Self { tasks: map }
    }

    /// Build from an id-keyed map, injecting the key as the id where the
    /// task doesn't carry one
    pub fn from_map(map: IndexMap<TaskId, Task>) -> Self {
        let mut tasks = IndexMap::with_capacity(map.len());
        for (id, mut task) in map {
            if task.id.as_str().is_empty() {
                task.id = id.clone();
            }
            tasks.insert(id, task);
        }
        Self { tasks }
    }

    /// Insert a task under its own id
    pub fn insert(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Look up a task by id
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Iterate tasks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Iterate ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.tasks.keys()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<Task> for TaskSet {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self::from_tasks(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_task_creation_derives_id() {
        let task = Task::new("Fix the Login Bug");
        assert_eq!(task.id.as_str(), "fix-the-login-bug");
        assert!(task.description.is_empty());
        assert!(task.metadata.tags.is_empty());
    }

    #[test]
    fn test_rename_rederives_id() {
        let mut task = Task::new("Old Name");
        task.rename("New Name");
        assert_eq!(task.name, "New Name");
        assert_eq!(task.id.as_str(), "new-name");
    }

    #[test]
    fn test_serialization_skips_id() {
        let task = Task::new("Test").with_description("Body");
        let json = serde_json::to_string_pretty(&task).unwrap();
        assert!(!json.contains("\"id\""));

        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Test");
        assert!(parsed.id.as_str().is_empty());
    }

    #[test]
    fn test_custom_metadata_round_trip() {
        let mut task = Task::new("Test");
        task.metadata
            .custom
            .insert("severity".into(), CustomValue::Number(3.0));
        task.metadata
            .custom
            .insert("triaged".into(), CustomValue::Boolean(true));

        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.metadata.custom.get("severity"),
            Some(&CustomValue::Number(3.0))
        );
        assert_eq!(
            parsed.metadata.custom.get("triaged"),
            Some(&CustomValue::Boolean(true))
        );
    }

    #[test]
    fn test_custom_date_values_parse_as_dates() {
        let json = r#"{"name": "Test", "metadata": {"reviewed": "2024-05-01T10:00:00Z"}}"#;
        let parsed: Task = serde_json::from_str(json).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(
            parsed.metadata.custom.get("reviewed").and_then(CustomValue::as_date),
            Some(expected)
        );
    }

    #[test]
    fn test_relation_kind_serializes_as_type() {
        let task = Task::new("Test").with_relations(vec![Relation {
            task: TaskId::from_string("other-task"),
            kind: "blocks".into(),
        }]);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["relations"][0]["type"], "blocks");

        let parsed: Task = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.relations[0].kind, "blocks");
    }

    #[test]
    fn test_task_set_from_map_injects_ids() {
        let mut map = IndexMap::new();
        let mut task = Task::new("Something");
        task.id = TaskId::from_string("");
        map.insert(TaskId::from_string("injected-id"), task);

        let set = TaskSet::from_map(map);
        let task = set.get(&TaskId::from_string("injected-id")).unwrap();
        assert_eq!(task.id.as_str(), "injected-id");
    }

    #[test]
    fn test_task_set_preserves_order() {
        let set = TaskSet::from_tasks(vec![Task::new("B Task"), Task::new("A Task")]);
        let ids: Vec<_> = set.ids().map(TaskId::as_str).collect();
        assert_eq!(ids, vec!["b-task", "a-task"]);
    }
}

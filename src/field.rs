//! Field accessors for the generic filter/sort machinery
//!
//! Filtering and sorting address task fields by name. Instead of dynamic
//! property lookup, the engine builds a registry once per board: a closed
//! set of built-in accessors plus one accessor per declared custom field.
//! Both the filter-spec spellings (`sub-task`, `count-sub-tasks`, ...) and
//! the sorter spellings (`subTasks`, `countSubTasks`, ...) resolve to the
//! same accessor.

use crate::types::{CustomField, CustomFieldType, CustomValue, DateField, Index, Options, Task};
use crate::workload;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

/// The kind of value a field yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Boolean,
}

/// A field's value for one task
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Boolean(bool),
}

impl FieldValue {
    /// String form, used by the sort-filter regex pass
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{}", n),
            Self::Date(d) => d.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

/// One addressable task field
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Id,
    Name,
    Description,
    Column,
    Created,
    Updated,
    Started,
    Completed,
    Due,
    Assigned,
    Workload,
    Progress,
    SubTaskText,
    CountSubTasks,
    TagText,
    CountTags,
    RelationText,
    CountRelations,
    CommentText,
    CountComments,
    Custom(CustomField),
}

impl Field {
    /// The kind of value this field yields
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Id
            | Self::Name
            | Self::Description
            | Self::Column
            | Self::Assigned
            | Self::SubTaskText
            | Self::TagText
            | Self::RelationText
            | Self::CommentText => FieldKind::Text,
            Self::Workload
            | Self::Progress
            | Self::CountSubTasks
            | Self::CountTags
            | Self::CountRelations
            | Self::CountComments => FieldKind::Number,
            Self::Created | Self::Updated | Self::Started | Self::Completed | Self::Due => {
                FieldKind::Date
            }
            Self::Custom(field) => match field.field_type {
                CustomFieldType::Boolean => FieldKind::Boolean,
                CustomFieldType::Number => FieldKind::Number,
                CustomFieldType::String => FieldKind::Text,
                CustomFieldType::Date => FieldKind::Date,
            },
        }
    }

    /// Evaluate this field for a task. `None` means the field is absent on
    /// this task. Derived values (workload, progress, joined text, counts)
    /// are computed fresh on every call.
    pub fn value(&self, index: &Index, task: &Task) -> Option<FieldValue> {
        match self {
            Self::Id => Some(FieldValue::Text(task.id.to_string())),
            Self::Name => Some(FieldValue::Text(task.name.clone())),
            Self::Description => Some(FieldValue::Text(task.description.clone())),
            Self::Column => index
                .find_task_column(&task.id)
                .map(|c| FieldValue::Text(c.to_string())),
            Self::Created => task.metadata.date(DateField::Created).map(FieldValue::Date),
            Self::Updated => task.metadata.date(DateField::Updated).map(FieldValue::Date),
            Self::Started => task.metadata.date(DateField::Started).map(FieldValue::Date),
            Self::Completed => task
                .metadata
                .date(DateField::Completed)
                .map(FieldValue::Date),
            Self::Due => task.metadata.date(DateField::Due).map(FieldValue::Date),
            Self::Assigned => task.metadata.assigned.clone().map(FieldValue::Text),
            Self::Workload => Some(FieldValue::Number(workload::task_workload(index, task))),
            Self::Progress => Some(FieldValue::Number(workload::task_progress(index, task))),
            Self::SubTaskText => Some(FieldValue::Text(
                task.sub_tasks
                    .iter()
                    .map(|s| format!("[{}] {}", if s.completed { "x" } else { " " }, s.text))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )),
            Self::CountSubTasks => Some(FieldValue::Number(task.sub_tasks.len() as f64)),
            Self::TagText => Some(FieldValue::Text(task.metadata.tags.join("\n"))),
            Self::CountTags => Some(FieldValue::Number(task.metadata.tags.len() as f64)),
            Self::RelationText => Some(FieldValue::Text(
                task.relations
                    .iter()
                    .map(|r| format!("{} {}", r.kind, r.task))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )),
            Self::CountRelations => Some(FieldValue::Number(task.relations.len() as f64)),
            Self::CommentText => Some(FieldValue::Text(
                task.comments
                    .iter()
                    .map(|c| format!("{} {}", c.author, c.text))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )),
            Self::CountComments => Some(FieldValue::Number(task.comments.len() as f64)),
            Self::Custom(field) => {
                task.metadata.custom.get(&field.name).map(|v| match v {
                    CustomValue::Boolean(b) => FieldValue::Boolean(*b),
                    CustomValue::Number(n) => FieldValue::Number(*n),
                    CustomValue::Date(d) => FieldValue::Date(*d),
                    CustomValue::String(s) => FieldValue::Text(s.clone()),
                })
            }
        }
    }
}

/// Build the field registry for a board's options.
///
/// Registers the built-in fields under both their filter-spec and sorter
/// names, then one entry per declared custom field.
pub fn registry(options: &Options) -> IndexMap<String, Field> {
    let mut fields = IndexMap::new();
    let builtins: &[(&str, Field)] = &[
        ("id", Field::Id),
        ("name", Field::Name),
        ("description", Field::Description),
        ("column", Field::Column),
        ("created", Field::Created),
        ("updated", Field::Updated),
        ("started", Field::Started),
        ("completed", Field::Completed),
        ("due", Field::Due),
        ("assigned", Field::Assigned),
        ("workload", Field::Workload),
        ("progress", Field::Progress),
        ("sub-task", Field::SubTaskText),
        ("subTasks", Field::SubTaskText),
        ("count-sub-tasks", Field::CountSubTasks),
        ("countSubTasks", Field::CountSubTasks),
        ("tag", Field::TagText),
        ("tags", Field::TagText),
        ("count-tags", Field::CountTags),
        ("countTags", Field::CountTags),
        ("relation", Field::RelationText),
        ("relations", Field::RelationText),
        ("count-relations", Field::CountRelations),
        ("countRelations", Field::CountRelations),
        ("comment", Field::CommentText),
        ("comments", Field::CommentText),
        ("count-comments", Field::CountComments),
        ("countComments", Field::CountComments),
    ];
    for (name, field) in builtins {
        fields.insert(name.to_string(), field.clone());
    }
    for custom in &options.custom_fields {
        fields.insert(custom.name.clone(), Field::Custom(custom.clone()));
    }
    fields
}

//! Multi-key stable sorting with regex-based value extraction
//!
//! Each task is decorated once per sort: every sorter's field is flattened
//! to a scalar through the accessor registry, and sorters carrying a filter
//! pattern have it applied up front. The comparator then walks the sorter
//! chain, falling through on ties; descending flips that one comparator's
//! sign and nothing else.

use crate::error::{BoardError, Result};
use crate::field::{self, Field, FieldValue};
use crate::types::{Index, SortOrder, Sorter, TaskId, TaskSet};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

/// Sort a column's tasks and replace its id order in the index
pub fn sort_column_in_index(
    index: &mut Index,
    tasks: &TaskSet,
    column: &str,
    sorters: &[Sorter],
) -> Result<()> {
    if !index.has_column(column) {
        return Err(BoardError::column_not_found(column));
    }

    let order: Vec<TaskId> = index.columns[column].clone();
    let mut column_tasks = Vec::with_capacity(order.len());
    for id in &order {
        let task = tasks
            .get(id)
            .ok_or_else(|| BoardError::task_file_not_found(id.as_str()))?;
        column_tasks.push(task);
    }

    let filters = compile_filters(sorters)?;
    let registry = field::registry(&index.options);

    let mut decorated: Vec<(TaskId, Vec<Option<FieldValue>>)> = column_tasks
        .iter()
        .map(|task| {
            let keys = decorate(index, &registry, task, sorters, &filters);
            (task.id.clone(), keys)
        })
        .collect();

    sort_decorated(&mut decorated, sorters);

    let new_order: Vec<TaskId> = decorated.into_iter().map(|(id, _)| id).collect();
    if let Some(ids) = index.columns.get_mut(column) {
        *ids = new_order;
    }
    Ok(())
}

/// Sort a task set by the given sorters, returning ids in the new order
pub fn sort_tasks(index: &Index, tasks: &TaskSet, sorters: &[Sorter]) -> Result<Vec<TaskId>> {
    let filters = compile_filters(sorters)?;
    let registry = field::registry(&index.options);
    let mut decorated: Vec<(TaskId, Vec<Option<FieldValue>>)> = tasks
        .iter()
        .map(|task| {
            let keys = decorate(index, &registry, task, sorters, &filters);
            (task.id.clone(), keys)
        })
        .collect();
    sort_decorated(&mut decorated, sorters);
    Ok(decorated.into_iter().map(|(id, _)| id).collect())
}

fn compile_filters(sorters: &[Sorter]) -> Result<Vec<Option<Regex>>> {
    sorters
        .iter()
        .map(|sorter| match &sorter.filter {
            Some(pattern) => RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(Some)
                .map_err(|e| BoardError::invalid_value("filter", e.to_string())),
            None => Ok(None),
        })
        .collect()
}

/// Flatten one task to a scalar per sorter. Absent built-in metadata fields
/// decorate as empty text; absent custom fields stay undefined and are
/// coerced at comparison time.
fn decorate(
    index: &Index,
    registry: &indexmap::IndexMap<String, Field>,
    task: &crate::types::Task,
    sorters: &[Sorter],
    filters: &[Option<Regex>],
) -> Vec<Option<FieldValue>> {
    sorters
        .iter()
        .zip(filters)
        .map(|(sorter, filter)| {
            let field = registry.get(&sorter.field);
            let mut value = field.and_then(|f| f.value(index, task));
            if value.is_none() {
                if let Some(Field::Created | Field::Updated | Field::Started
                    | Field::Completed | Field::Due | Field::Assigned) = field
                {
                    value = Some(FieldValue::Text(String::new()));
                }
            }
            match (filter, value) {
                (Some(regex), Some(v)) => {
                    Some(FieldValue::Text(sort_filter(regex, &v.to_text())))
                }
                (_, v) => v,
            }
        })
        .collect()
}

fn sort_decorated(decorated: &mut [(TaskId, Vec<Option<FieldValue>>)], sorters: &[Sorter]) {
    decorated.sort_by(|(_, a), (_, b)| {
        for (i, sorter) in sorters.iter().enumerate() {
            let ordering = compare_values(a[i].as_ref(), b[i].as_ref());
            if ordering != Ordering::Equal {
                return match sorter.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                };
            }
        }
        Ordering::Equal
    });
}

/// Extract the sortable part of a value through a regex.
///
/// For each match: named-group values joined in declaration order when the
/// pattern has named groups, else group 1 when present, else the whole
/// match. All matches are concatenated.
pub fn sort_filter(regex: &Regex, value: &str) -> String {
    let named: Vec<&str> = regex.capture_names().flatten().collect();
    let mut out = String::new();
    for caps in regex.captures_iter(value) {
        if !named.is_empty() {
            for name in &named {
                if let Some(m) = caps.name(name) {
                    out.push_str(m.as_str());
                }
            }
        } else if let Some(group) = caps.get(1) {
            out.push_str(group.as_str());
        } else if let Some(whole) = caps.get(0) {
            out.push_str(whole.as_str());
        }
    }
    out
}

/// Compare two decorated values.
///
/// Undefined coerces to empty text against text and to 0 against anything
/// numeric. Text compares case-insensitively with accents folded;
/// everything else compares numerically (dates via epoch millis).
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => fold(a).cmp(&fold(b)),
        (None, Some(FieldValue::Text(b))) => fold("").cmp(&fold(b)),
        (Some(FieldValue::Text(a)), None) => fold(a).cmp(&fold("")),
        (a, b) => as_number(a)
            .partial_cmp(&as_number(b))
            .unwrap_or(Ordering::Equal),
    }
}

fn as_number(value: Option<&FieldValue>) -> f64 {
    match value {
        Some(FieldValue::Number(n)) => *n,
        Some(FieldValue::Date(d)) => d.timestamp_millis() as f64,
        Some(FieldValue::Boolean(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(FieldValue::Text(s)) => s.trim().parse().unwrap_or(0.0),
        None => 0.0,
    }
}

/// Lowercase and strip the common Latin accents, approximating an
/// accent-insensitive collation
fn fold(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ñ' => 'n',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Task, TaskSet};
    use chrono::{TimeZone, Utc};

    fn sorter(field: &str, order: SortOrder) -> Sorter {
        Sorter {
            field: field.into(),
            order,
            filter: None,
        }
    }

    fn fixture() -> (Index, TaskSet) {
        let mut index = Index::new("Test", &["Todo"]);
        let mut tasks = Vec::new();
        for (name, tags, due) in [
            ("Caffè latte", vec!["Small"], Some((2024, 5, 3))),
            ("Apricot", vec!["Large"], Some((2024, 5, 1))),
            ("banana", vec!["Small"], None),
        ] {
            let mut task =
                Task::new(name).with_tags(tags.into_iter().map(String::from).collect());
            if let Some((y, m, d)) = due {
                task.metadata.due = Some(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap());
            }
            index.columns[0].push(task.id.clone());
            tasks.push(task);
        }
        (index, TaskSet::from_tasks(tasks))
    }

    #[test]
    fn test_sort_by_name_case_and_accent_insensitive() {
        let (index, tasks) = fixture();
        let order =
            sort_tasks(&index, &tasks, &[sorter("name", SortOrder::Ascending)]).unwrap();
        let names: Vec<_> = order.iter().map(TaskId::as_str).collect();
        assert_eq!(names, vec!["apricot", "banana", "caffè-latte"]);
    }

    #[test]
    fn test_descending_is_sign_flip_of_ascending() {
        let (index, tasks) = fixture();
        let asc = sort_tasks(&index, &tasks, &[sorter("name", SortOrder::Ascending)]).unwrap();
        let mut desc =
            sort_tasks(&index, &tasks, &[sorter("name", SortOrder::Descending)]).unwrap();
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_tie_break_chain_unaffected_by_direction() {
        let (index, tasks) = fixture();
        // Workload ties the two Small tasks; name breaks the tie
        let asc = sort_tasks(
            &index,
            &tasks,
            &[
                sorter("workload", SortOrder::Ascending),
                sorter("name", SortOrder::Ascending),
            ],
        )
        .unwrap();
        let ids: Vec<_> = asc.iter().map(TaskId::as_str).collect();
        assert_eq!(ids, vec!["banana", "caffè-latte", "apricot"]);

        // Flipping the primary direction must not flip the tie-break
        let desc = sort_tasks(
            &index,
            &tasks,
            &[
                sorter("workload", SortOrder::Descending),
                sorter("name", SortOrder::Ascending),
            ],
        )
        .unwrap();
        let ids: Vec<_> = desc.iter().map(TaskId::as_str).collect();
        assert_eq!(ids, vec!["apricot", "banana", "caffè-latte"]);
    }

    #[test]
    fn test_sort_by_date_absent_sorts_first() {
        let (index, tasks) = fixture();
        let order = sort_tasks(&index, &tasks, &[sorter("due", SortOrder::Ascending)]).unwrap();
        let ids: Vec<_> = order.iter().map(TaskId::as_str).collect();
        // banana has no due date; it decorates as empty text, coerced to 0
        assert_eq!(ids, vec!["banana", "apricot", "caffè-latte"]);
    }

    #[test]
    fn test_sort_filter_extraction() {
        let re = RegexBuilder::new(r"TASK-(\d+)")
            .case_insensitive(true)
            .build()
            .unwrap();
        assert_eq!(sort_filter(&re, "task-42 then TASK-7"), "427");

        let re = RegexBuilder::new(r"(?P<major>\d+)\.(?P<minor>\d+)")
            .case_insensitive(true)
            .build()
            .unwrap();
        assert_eq!(sort_filter(&re, "v2.13"), "213");

        let re = RegexBuilder::new(r"\d+").case_insensitive(true).build().unwrap();
        assert_eq!(sort_filter(&re, "a1b2"), "12");

        assert_eq!(sort_filter(&re, "no digits"), "");
    }

    #[test]
    fn test_sorter_filter_applies_before_compare() {
        let mut index = Index::new("Test", &["Todo"]);
        let mut tasks = Vec::new();
        for name in ["Issue 10", "Issue 2"] {
            let task = Task::new(name);
            index.columns[0].push(task.id.clone());
            tasks.push(task);
        }
        let tasks = TaskSet::from_tasks(tasks);

        // Without the filter, "issue-10" sorts before "issue-2" textually
        let order = sort_tasks(&index, &tasks, &[sorter("name", SortOrder::Ascending)]).unwrap();
        assert_eq!(order[0].as_str(), "issue-10");

        // The extracted digits compare as text too - "10" < "2" - matching
        // the original engine's extract-then-compare behavior
        let with_filter = Sorter {
            field: "name".into(),
            order: SortOrder::Ascending,
            filter: Some(r"\d+".into()),
        };
        let order = sort_tasks(&index, &tasks, &[with_filter]).unwrap();
        assert_eq!(order[0].as_str(), "issue-10");
    }

    #[test]
    fn test_invalid_filter_pattern_errors() {
        let (index, tasks) = fixture();
        let bad = Sorter {
            field: "name".into(),
            order: SortOrder::Ascending,
            filter: Some("(unclosed".into()),
        };
        assert!(sort_tasks(&index, &tasks, &[bad]).is_err());
    }

    #[test]
    fn test_sort_column_in_index_rewrites_order() {
        let (mut index, tasks) = fixture();
        sort_column_in_index(&mut index, &tasks, "Todo", &[sorter("name", SortOrder::Ascending)])
            .unwrap();
        let ids: Vec<_> = index.columns["Todo"].iter().map(TaskId::as_str).collect();
        assert_eq!(ids, vec!["apricot", "banana", "caffè-latte"]);

        let err = sort_column_in_index(
            &mut index,
            &tasks,
            "Missing",
            &[sorter("name", SortOrder::Ascending)],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_compare_values_coercions() {
        use FieldValue::*;
        assert_eq!(compare_values(None, None), Ordering::Equal);
        assert_eq!(
            compare_values(None, Some(&Text("a".into()))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&Number(3.0)), None),
            Ordering::Greater
        );
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            compare_values(Some(&Date(early)), Some(&Date(late))),
            Ordering::Less
        );
    }
}

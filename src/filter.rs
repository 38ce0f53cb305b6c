//! Stateless filter predicates and the task-filtering pass
//!
//! Scalars arrive as one-element slices. Strings filter by substring
//! containment (an array is an OR), dates by calendar day (an array is an
//! inclusive timestamp range), numbers by inclusive range.

use crate::field::{self, FieldValue};
use crate::types::{FilterSpec, FilterValue, Index, TaskId, TaskSet};
use chrono::{DateTime, Utc};

/// Substring containment; any element of an array filter may match
pub fn string_filter(filter: &[String], input: &str) -> bool {
    filter.iter().any(|f| input.contains(f.as_str()))
}

/// A single date matches on the same calendar day (time of day ignored);
/// several dates form an inclusive `[min, max]` range over full timestamps
pub fn date_filter(filter: &[DateTime<Utc>], input: DateTime<Utc>) -> bool {
    match filter {
        [] => false,
        [single] => single.date_naive() == input.date_naive(),
        many => match (many.iter().min(), many.iter().max()) {
            (Some(min), Some(max)) => input >= *min && input <= *max,
            _ => false,
        },
    }
}

/// Inclusive `[min, max]` range; a one-element filter behaves as equality
pub fn number_filter(filter: &[f64], input: f64) -> bool {
    if filter.is_empty() {
        return false;
    }
    let min = filter.iter().copied().fold(f64::INFINITY, f64::min);
    let max = filter.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    input >= min && input <= max
}

/// Filter a task set against a spec.
///
/// A task passes when every key in the spec succeeds; a key fails when the
/// field is absent on the task, its kind doesn't match the filter value, or
/// the spec names a field the board doesn't declare. Derived values are
/// computed fresh per evaluation. An empty spec passes every task, order
/// and ids preserved.
pub fn filter_tasks(index: &Index, tasks: &TaskSet, spec: &FilterSpec) -> Vec<TaskId> {
    let fields = field::registry(&index.options);
    tasks
        .iter()
        .filter(|task| {
            spec.iter().all(|(name, filter)| {
                fields
                    .get(name)
                    .and_then(|f| f.value(index, task))
                    .map_or(false, |value| matches(&value, filter))
            })
        })
        .map(|task| task.id.clone())
        .collect()
}

fn matches(value: &FieldValue, filter: &FilterValue) -> bool {
    match (value, filter) {
        (FieldValue::Text(input), FilterValue::Strings(f)) => string_filter(f, input),
        (FieldValue::Number(input), FilterValue::Numbers(f)) => number_filter(f, *input),
        (FieldValue::Date(input), FilterValue::Dates(f)) => date_filter(f, *input),
        (FieldValue::Boolean(input), FilterValue::Boolean(f)) => input == f,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Task;
    use chrono::TimeZone;
    use indexmap::IndexMap;

    #[test]
    fn test_string_filter() {
        assert!(string_filter(&["a".into(), "b".into()], "xbz"));
        assert!(!string_filter(&["a".into()], "xbz"));
        assert!(string_filter(&["bug".into()], "fix login bug"));
    }

    #[test]
    fn test_date_filter_scalar_is_calendar_day() {
        let filter = Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap();
        let input = Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap();
        assert!(date_filter(&[filter], input));

        let next_day = Utc.with_ymd_and_hms(2024, 5, 2, 1, 0, 0).unwrap();
        assert!(!date_filter(&[filter], next_day));
    }

    #[test]
    fn test_date_filter_array_is_timestamp_range() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap();

        // No day-truncation: earlier the same day as the lower bound is out
        let same_day_earlier = Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap();
        assert!(!date_filter(&[a, b], same_day_earlier));

        let inside = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        assert!(date_filter(&[a, b], inside));
        assert!(date_filter(&[a, b], a));
        assert!(date_filter(&[a, b], b));
    }

    #[test]
    fn test_number_filter() {
        assert!(number_filter(&[3.0, 3.0], 3.0));
        assert!(!number_filter(&[1.0, 2.0], 3.0));
        assert!(number_filter(&[5.0], 5.0));
        assert!(number_filter(&[2.0, 8.0], 5.0));
    }

    fn fixture() -> (Index, TaskSet) {
        let mut index = Index::new("Test", &["Todo", "Done"]);
        let mut alpha = Task::new("Alpha")
            .with_tags(vec!["urgent".into()])
            .with_assigned("alice");
        alpha.metadata.due = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let beta = Task::new("Beta feature");
        index.columns[0].push(alpha.id.clone());
        index.columns[1].push(beta.id.clone());
        (index, TaskSet::from_tasks(vec![alpha, beta]))
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let (index, tasks) = fixture();
        let ids = filter_tasks(&index, &tasks, &IndexMap::new());
        let ids: Vec<_> = ids.iter().map(TaskId::as_str).collect();
        assert_eq!(ids, vec!["alpha", "beta-feature"]);
    }

    #[test]
    fn test_and_across_keys() {
        let (index, tasks) = fixture();
        let mut spec = FilterSpec::new();
        spec.insert("name".into(), FilterValue::string("a"));
        spec.insert("column".into(), FilterValue::string("Todo"));

        let ids = filter_tasks(&index, &tasks, &spec);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "alpha");
    }

    #[test]
    fn test_absent_field_fails_the_key() {
        let (index, tasks) = fixture();
        let mut spec = FilterSpec::new();
        spec.insert(
            "due".into(),
            FilterValue::date(Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap()),
        );

        // Only alpha has a due date at all
        let ids = filter_tasks(&index, &tasks, &spec);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "alpha");
    }

    #[test]
    fn test_unknown_field_fails_every_task() {
        let (index, tasks) = fixture();
        let mut spec = FilterSpec::new();
        spec.insert("no-such-field".into(), FilterValue::string("x"));
        assert!(filter_tasks(&index, &tasks, &spec).is_empty());
    }

    #[test]
    fn test_derived_fields() {
        let (index, tasks) = fixture();
        let mut spec = FilterSpec::new();
        spec.insert("tag".into(), FilterValue::string("urgent"));
        let ids = filter_tasks(&index, &tasks, &spec);
        assert_eq!(ids.len(), 1);

        let mut spec = FilterSpec::new();
        spec.insert("count-tags".into(), FilterValue::number(0.0));
        let ids = filter_tasks(&index, &tasks, &spec);
        assert_eq!(ids[0].as_str(), "beta-feature");
    }
}

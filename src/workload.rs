//! Workload and progress computation, time-windowed aggregation, and the
//! primitives burndown sampling is built from.
//!
//! Workload is the numeric weight of a task, derived from its weighted
//! tags. Progress is the completed fraction. Period/sprint statistics and
//! active-task sampling all run over [`TaskSnapshot`]s - per-task records
//! hydrated once from the index and task set.

use crate::error::{BoardError, Result};
use crate::types::{DateField, Index, Sprint, Task, TaskId, TaskSet};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Weight of a task: the sum of its configured tag weights.
///
/// A task with no tag matching any weighted name falls back to the board's
/// default workload, even when it carries other, unweighted tags.
pub fn task_workload(index: &Index, task: &Task) -> f64 {
    let mut total = 0.0;
    let mut matched = false;
    for tag in &task.metadata.tags {
        if let Some(weight) = index.options.task_workload_tags.get(tag) {
            total += weight;
            matched = true;
        }
    }
    if matched {
        total
    } else {
        index.options.default_task_workload
    }
}

/// A task counts as completed when it sits in a completed column or carries
/// a completed timestamp.
pub fn task_completed(index: &Index, task: &Task) -> bool {
    if task.metadata.completed.is_some() {
        return true;
    }
    index
        .find_task_column(&task.id)
        .is_some_and(|column| index.options.completed_columns.iter().any(|c| c == column))
}

/// Progress in `[0, 1]`: 1 when completed, else the task's own progress
/// metadata (0 when unset).
pub fn task_progress(index: &Index, task: &Task) -> f64 {
    if task_completed(index, task) {
        1.0
    } else {
        task.metadata.progress.unwrap_or(0.0)
    }
}

/// A per-task record hydrated for reporting.
///
/// `started`/`completed` carry the raw metadata values; the effective
/// values used for activity sampling fall back to `created` and (for tasks
/// sitting in a completed column) `updated`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub column: String,
    pub workload: f64,
    pub progress: f64,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
    pub in_completed_column: bool,
}

impl TaskSnapshot {
    /// Hydrate snapshots for every tracked task in the set
    pub fn build(index: &Index, tasks: &TaskSet) -> Vec<TaskSnapshot> {
        tasks
            .iter()
            .filter_map(|task| {
                let column = index.find_task_column(&task.id)?.to_string();
                let in_completed_column =
                    index.options.completed_columns.iter().any(|c| *c == column);
                Some(TaskSnapshot {
                    id: task.id.clone(),
                    column,
                    workload: task_workload(index, task),
                    progress: task_progress(index, task),
                    created: task.metadata.created,
                    updated: task.metadata.updated,
                    started: task.metadata.started,
                    completed: task.metadata.completed,
                    due: task.metadata.due,
                    in_completed_column,
                })
            })
            .collect()
    }

    /// The raw metadata value for a date field
    pub fn date(&self, field: DateField) -> Option<DateTime<Utc>> {
        match field {
            DateField::Created => self.created,
            DateField::Updated => self.updated,
            DateField::Started => self.started,
            DateField::Completed => self.completed,
            DateField::Due => self.due,
        }
    }

    fn effective_started(&self) -> Option<DateTime<Utc>> {
        self.started.or(self.created)
    }

    fn effective_completed(&self) -> Option<DateTime<Utc>> {
        self.completed.or(if self.in_completed_column {
            self.updated
        } else {
            None
        })
    }

    /// Whether the task was active at the given instant: started on or
    /// before it, and not yet completed
    pub fn active_at(&self, date: DateTime<Utc>) -> bool {
        match self.effective_started() {
            Some(started) if started <= date => self
                .effective_completed()
                .map_or(true, |completed| completed > date),
            _ => false,
        }
    }

    /// Truncate every timestamp to the given resolution
    pub fn normalised(mut self, resolution: DateResolution) -> Self {
        for slot in [
            &mut self.created,
            &mut self.updated,
            &mut self.started,
            &mut self.completed,
            &mut self.due,
        ] {
            *slot = slot.map(|d| normalise_date(d, resolution));
        }
        self
    }
}

/// Workload aggregated over a time window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodWorkload {
    pub tasks: Vec<PeriodTask>,
    pub workload: f64,
}

/// One task's contribution to a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTask {
    pub id: TaskId,
    pub column: String,
    pub workload: f64,
}

/// Sum the workload of tasks whose `date_field` lies in `[start, end]`
pub fn task_workload_in_period(
    snapshots: &[TaskSnapshot],
    date_field: DateField,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> PeriodWorkload {
    let tasks: Vec<PeriodTask> = snapshots
        .iter()
        .filter(|s| {
            s.date(date_field)
                .is_some_and(|d| d >= start && d <= end)
        })
        .map(|s| PeriodTask {
            id: s.id.clone(),
            column: s.column.clone(),
            workload: s.workload,
        })
        .collect();
    let workload = tasks.iter().map(|t| t.workload).sum();
    PeriodWorkload { tasks, workload }
}

/// Tasks active at an instant
pub fn active_tasks_at_date(
    snapshots: &[TaskSnapshot],
    date: DateTime<Utc>,
) -> Vec<&TaskSnapshot> {
    snapshots.iter().filter(|s| s.active_at(date)).collect()
}

/// Total workload of the tasks active at an instant
pub fn workload_at_date(snapshots: &[TaskSnapshot], date: DateTime<Utc>) -> f64 {
    active_tasks_at_date(snapshots, date)
        .iter()
        .map(|s| s.workload)
        .sum()
}

/// Number of tasks active at an instant
pub fn count_active_tasks_at_date(snapshots: &[TaskSnapshot], date: DateTime<Utc>) -> usize {
    active_tasks_at_date(snapshots, date).len()
}

/// What happened to a task at an exact instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskEventKind {
    Created,
    Started,
    Completed,
}

/// A discrete event marker for burndown charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskEvent {
    pub kind: TaskEventKind,
    pub task: TaskId,
}

/// Exact-instant matches of created/started/completed timestamps. Callers
/// normalise snapshots to the sampling resolution first so instants line up.
pub fn task_events_at_date(snapshots: &[TaskSnapshot], date: DateTime<Utc>) -> Vec<TaskEvent> {
    let mut events = Vec::new();
    for snapshot in snapshots {
        for (field, kind) in [
            (snapshot.created, TaskEventKind::Created),
            (snapshot.started, TaskEventKind::Started),
            (snapshot.completed, TaskEventKind::Completed),
        ] {
            if field == Some(date) {
                events.push(TaskEvent {
                    kind,
                    task: snapshot.id.clone(),
                });
            }
        }
    }
    events
}

/// Timestamp truncation granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateResolution {
    #[default]
    Days,
    Hours,
    Minutes,
    Seconds,
}

/// Truncate a timestamp to a resolution. Each coarser resolution implies
/// all finer clears: days zeroes the time of day entirely, seconds only
/// drops subsecond precision.
pub fn normalise_date(date: DateTime<Utc>, resolution: DateResolution) -> DateTime<Utc> {
    let mut date = date.with_nanosecond(0).unwrap_or(date);
    if resolution == DateResolution::Seconds {
        return date;
    }
    date = date.with_second(0).unwrap_or(date);
    if resolution == DateResolution::Minutes {
        return date;
    }
    date = date.with_minute(0).unwrap_or(date);
    if resolution == DateResolution::Hours {
        return date;
    }
    date.with_hour(0).unwrap_or(date)
}

/// How a sprint is selected: by 1-based number or by name
#[derive(Debug, Clone, PartialEq)]
pub enum SprintSelector {
    Number(usize),
    Name(String),
}

/// A sprint's resolved window. The end is the next sprint's start; the
/// current (last) sprint has no end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintPeriod {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// Resolve a sprint selector against the configured sprints
pub fn sprint_period(sprints: &[Sprint], selector: &SprintSelector) -> Result<SprintPeriod> {
    let position = match selector {
        SprintSelector::Number(n) => {
            if *n == 0 || *n > sprints.len() {
                return Err(BoardError::sprint_not_found(format!(
                    "sprint {} does not exist (the board has {} sprints)",
                    n,
                    sprints.len()
                )));
            }
            n - 1
        }
        SprintSelector::Name(name) => sprints
            .iter()
            .position(|s| &s.name == name)
            .ok_or_else(|| {
                BoardError::sprint_not_found(format!("no sprint found with name \"{}\"", name))
            })?,
    };
    Ok(SprintPeriod {
        name: sprints[position].name.clone(),
        start: sprints[position].start,
        end: sprints.get(position + 1).map(|s| s.start),
    })
}

/// Workload statistics for a sprint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintStats {
    pub name: String,
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub created: PeriodWorkload,
    pub started: PeriodWorkload,
    pub completed: PeriodWorkload,
    pub due: PeriodWorkload,
}

/// Per-date-field workload over a sprint's window. With no selector the
/// current sprint (the last declared) is used.
pub fn calculate_sprint_stats(
    index: &Index,
    snapshots: &[TaskSnapshot],
    selector: Option<&SprintSelector>,
) -> Result<SprintStats> {
    let sprints = &index.options.sprints;
    if sprints.is_empty() {
        return Err(BoardError::sprint_not_found("the board has no sprints"));
    }
    let period = match selector {
        Some(selector) => sprint_period(sprints, selector)?,
        None => sprint_period(sprints, &SprintSelector::Number(sprints.len()))?,
    };
    let window_end = period.end.unwrap_or_else(Utc::now);
    Ok(SprintStats {
        name: period.name.clone(),
        start: period.start,
        end: period.end,
        created: task_workload_in_period(snapshots, DateField::Created, period.start, window_end),
        started: task_workload_in_period(snapshots, DateField::Started, period.start, window_end),
        completed: task_workload_in_period(
            snapshots,
            DateField::Completed,
            period.start,
            window_end,
        ),
        due: task_workload_in_period(snapshots, DateField::Due, period.start, window_end),
    })
}

/// Workload statistics for an explicit period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created: PeriodWorkload,
    pub started: PeriodWorkload,
    pub completed: PeriodWorkload,
    pub due: PeriodWorkload,
}

/// The window implied by explicit dates: one date expands to that whole
/// calendar day, several use the earliest and latest instants given.
pub fn period_bounds(dates: &[DateTime<Utc>]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    match dates {
        [] => None,
        [single] => {
            let day = single.date_naive();
            let start = day.and_hms_milli_opt(0, 0, 0, 0)?.and_utc();
            let end = day.and_hms_milli_opt(23, 59, 59, 999)?.and_utc();
            Some((start, end))
        }
        many => {
            let start = many.iter().min().copied()?;
            let end = many.iter().max().copied()?;
            Some((start, end))
        }
    }
}

/// Per-date-field workload over an explicit period
pub fn calculate_period_stats(
    snapshots: &[TaskSnapshot],
    dates: &[DateTime<Utc>],
) -> Result<PeriodStats> {
    let (start, end) = period_bounds(dates)
        .ok_or_else(|| BoardError::invalid_value("dates", "at least one date is required"))?;
    Ok(PeriodStats {
        start,
        end,
        created: task_workload_in_period(snapshots, DateField::Created, start, end),
        started: task_workload_in_period(snapshots, DateField::Started, start, end),
        completed: task_workload_in_period(snapshots, DateField::Completed, start, end),
        due: task_workload_in_period(snapshots, DateField::Due, start, end),
    })
}

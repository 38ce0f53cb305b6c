//! BurndownReport command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::workload::{
    count_active_tasks_at_date, normalise_date, period_bounds, sprint_period, task_events_at_date,
    workload_at_date, DateResolution, SprintSelector, TaskEvent, TaskSnapshot,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const DEFAULT_POINT_COUNT: usize = 30;

/// Sample remaining workload over a window: a sprint, an explicit date
/// range, or the whole board history
#[derive(Debug, Clone, Default)]
pub struct BurndownReport {
    /// Use this sprint's window
    pub sprint: Option<SprintSelector>,
    /// Use the window these dates imply
    pub dates: Vec<DateTime<Utc>>,
    /// Granularity task dates are truncated to before sampling
    pub resolution: DateResolution,
}

impl BurndownReport {
    /// Create a burndown report over the whole board history
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a sprint's window
    pub fn for_sprint(mut self, sprint: SprintSelector) -> Self {
        self.sprint = Some(sprint);
        self
    }

    /// Use the window the dates imply
    pub fn with_dates(mut self, dates: Vec<DateTime<Utc>>) -> Self {
        self.dates = dates;
        self
    }

    /// Set the sampling resolution
    pub fn with_resolution(mut self, resolution: DateResolution) -> Self {
        self.resolution = resolution;
        self
    }
}

/// One sampled instant
#[derive(Debug, Clone, Serialize)]
pub struct BurndownPoint {
    pub date: DateTime<Utc>,
    /// Total workload of tasks active at this instant
    pub workload: f64,
    /// Number of tasks active at this instant
    pub count: usize,
    /// Tasks created or completed exactly at this instant
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TaskEvent>,
}

/// The burndown report output
#[derive(Debug, Clone, Serialize)]
pub struct BurndownData {
    /// Sprint name when the window came from a sprint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint: Option<String>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub points: Vec<BurndownPoint>,
}

#[async_trait]
impl Execute<BoardContext, BoardError> for BurndownReport {
    type Output = BurndownData;

    async fn execute(&self, ctx: &BoardContext) -> Result<BurndownData> {
        ctx.require_initialised()?;
        let index = ctx.load_index().await?;
        let tasks = ctx.load_tracked_tasks(&index).await?;

        let snapshots: Vec<TaskSnapshot> = TaskSnapshot::build(&index, &tasks)
            .into_iter()
            .map(|s| s.normalised(self.resolution))
            .collect();

        let mut sprint_name = None;
        let (from, to) = if let Some(selector) = &self.sprint {
            let period = sprint_period(&index.options.sprints, selector)?;
            sprint_name = Some(period.name);
            (period.start, period.end.unwrap_or_else(Utc::now))
        } else if !self.dates.is_empty() {
            period_bounds(&self.dates)
                .ok_or_else(|| BoardError::invalid_value("dates", "at least one date is required"))?
        } else {
            // Whole board history: earliest creation to now
            let earliest = snapshots
                .iter()
                .filter_map(|s| s.created)
                .min()
                .unwrap_or_else(Utc::now);
            (earliest, Utc::now())
        };

        let points = sample_points(&snapshots, from, to, self.resolution);
        Ok(BurndownData {
            sprint: sprint_name,
            from,
            to,
            points,
        })
    }
}

/// Evenly spaced samples across `[from, to]`, each truncated to the
/// resolution before the snapshots are queried
fn sample_points(
    snapshots: &[TaskSnapshot],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    resolution: DateResolution,
) -> Vec<BurndownPoint> {
    let span = (to - from).num_milliseconds().max(0);
    let count = if span == 0 { 1 } else { DEFAULT_POINT_COUNT };

    let mut points: Vec<BurndownPoint> = Vec::with_capacity(count);
    for i in 0..count {
        let offset = if count == 1 {
            0
        } else {
            span * i as i64 / (count as i64 - 1)
        };
        let date = normalise_date(from + Duration::milliseconds(offset), resolution);
        if points.last().is_some_and(|p| p.date == date) {
            continue;
        }
        points.push(BurndownPoint {
            date,
            workload: workload_at_date(snapshots, date),
            count: count_active_tasks_at_date(snapshots, date),
            events: task_events_at_date(snapshots, date),
        });
    }
    points
}

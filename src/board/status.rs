//! StatusReport command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::workload::{
    calculate_period_stats, calculate_sprint_stats, PeriodStats, SprintSelector, SprintStats,
    TaskSnapshot,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Summarise the board: per-column counts and workload, untracked files,
/// and optional sprint or period statistics
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    /// Report statistics for this sprint
    pub sprint: Option<SprintSelector>,
    /// Report statistics for the period these dates imply
    pub dates: Vec<DateTime<Utc>>,
}

impl StatusReport {
    /// Create a status report for the whole board
    pub fn new() -> Self {
        Self::default()
    }

    /// Include statistics for a sprint
    pub fn with_sprint(mut self, sprint: SprintSelector) -> Self {
        self.sprint = Some(sprint);
        self
    }

    /// Include statistics for the period the dates imply
    pub fn with_dates(mut self, dates: Vec<DateTime<Utc>>) -> Self {
        self.dates = dates;
        self
    }
}

/// Workload totals for one column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnStatus {
    /// Number of tasks in the column
    pub count: usize,
    /// Sum of task workloads
    pub workload: f64,
    /// Workload scaled down by each task's progress
    pub remaining: f64,
}

/// The status report output
#[derive(Debug, Clone, Serialize)]
pub struct BoardStatus {
    pub name: String,
    pub tracked: usize,
    pub untracked: usize,
    pub columns: IndexMap<String, ColumnStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint: Option<SprintStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodStats>,
}

#[async_trait]
impl Execute<BoardContext, BoardError> for StatusReport {
    type Output = BoardStatus;

    async fn execute(&self, ctx: &BoardContext) -> Result<BoardStatus> {
        ctx.require_initialised()?;
        let index = ctx.load_index().await?;
        let tasks = ctx.load_tracked_tasks(&index).await?;

        let mut columns: IndexMap<String, ColumnStatus> = index
            .columns
            .keys()
            .map(|name| (name.clone(), ColumnStatus::default()))
            .collect();
        for (column, ids) in &index.columns {
            let status = &mut columns[column.as_str()];
            for id in ids {
                let task = tasks.get(id).ok_or_else(|| {
                    BoardError::task_file_not_found(id.as_str())
                })?;
                let workload = crate::workload::task_workload(&index, task);
                let progress = crate::workload::task_progress(&index, task);
                status.count += 1;
                status.workload += workload;
                status.remaining += workload * (1.0 - progress);
            }
        }

        let untracked = ctx.untracked_task_ids(&index).await?.len();

        let mut sprint = None;
        let mut period = None;
        if self.sprint.is_some() || !self.dates.is_empty() {
            let snapshots = TaskSnapshot::build(&index, &tasks);
            if self.sprint.is_some() {
                sprint = Some(calculate_sprint_stats(
                    &index,
                    &snapshots,
                    self.sprint.as_ref(),
                )?);
            }
            if !self.dates.is_empty() {
                period = Some(calculate_period_stats(&snapshots, &self.dates)?);
            }
        }

        Ok(BoardStatus {
            name: index.name.clone(),
            tracked: index.task_count(),
            untracked,
            columns,
            sprint,
            period,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::CreateTask;
    use chrono::TimeZone;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext) {
        let temp = TempDir::new().unwrap();
        let ctx = BoardContext::open(temp.path().join(".taskboard"));
        InitBoard::new("Test").execute(&ctx).await.unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_status_counts_and_workload() {
        let (_temp, ctx) = setup().await;

        CreateTask::new("Plain").execute(&ctx).await.unwrap();
        CreateTask::new("Big")
            .with_tags(vec!["Huge".into()])
            .execute(&ctx)
            .await
            .unwrap();
        CreateTask::new("Half done")
            .with_progress(0.5)
            .in_column("Todo")
            .execute(&ctx)
            .await
            .unwrap();

        let status = StatusReport::new().execute(&ctx).await.unwrap();
        assert_eq!(status.name, "Test");
        assert_eq!(status.tracked, 3);
        assert_eq!(status.untracked, 0);

        let backlog = &status.columns["Backlog"];
        assert_eq!(backlog.count, 2);
        // Default workload 2 plus Huge weight 8
        assert_eq!(backlog.workload, 10.0);
        assert_eq!(backlog.remaining, 10.0);

        let todo = &status.columns["Todo"];
        assert_eq!(todo.count, 1);
        assert_eq!(todo.workload, 2.0);
        assert_eq!(todo.remaining, 1.0);
    }

    #[tokio::test]
    async fn test_status_counts_untracked_files() {
        let (_temp, ctx) = setup().await;

        let loose = crate::types::Task::new("Loose");
        ctx.store().save_task(&loose.id, &loose).await.unwrap();

        let status = StatusReport::new().execute(&ctx).await.unwrap();
        assert_eq!(status.tracked, 0);
        assert_eq!(status.untracked, 1);
    }

    #[tokio::test]
    async fn test_status_period_statistics() {
        let (_temp, ctx) = setup().await;
        CreateTask::new("Recent").execute(&ctx).await.unwrap();

        let status = StatusReport::new()
            .with_dates(vec![Utc::now()])
            .execute(&ctx)
            .await
            .unwrap();
        let period = status.period.unwrap();
        assert_eq!(period.created.workload, 2.0);
        assert_eq!(period.created.tasks.len(), 1);

        // A day with nothing on it
        let status = StatusReport::new()
            .with_dates(vec![Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()])
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(status.period.unwrap().created.workload, 0.0);
    }

    #[tokio::test]
    async fn test_status_sprint_without_sprints_fails() {
        let (_temp, ctx) = setup().await;
        let result = StatusReport::new()
            .with_sprint(SprintSelector::Number(1))
            .execute(&ctx)
            .await;
        assert!(matches!(result, Err(BoardError::SprintNotFound { .. })));
    }
}

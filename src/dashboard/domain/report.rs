//! Aggregate dashboard report.

use super::TemporalQuery;
use crate::workspace::domain::{Priority, Task, TaskStatus};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a dashboard alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertLevel {
    /// Overdue work.
    Danger,
    /// Blocked work.
    Warning,
    /// Work due today.
    Info,
}

impl AlertLevel {
    /// Returns the lowercase level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition worth the user's attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Severity.
    pub level: AlertLevel,
    /// Number of tasks behind the alert.
    pub count: usize,
    /// Human-readable summary.
    pub message: String,
}

impl Alert {
    fn new(level: AlertLevel, count: usize, noun: &str) -> Self {
        let plural = if count == 1 { "task" } else { "tasks" };
        Self {
            level,
            count,
            message: format!("{count} {plural} {noun}"),
        }
    }
}

/// Headline task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardMetrics {
    /// Number of top-level tasks.
    pub total: usize,
    /// Tasks due today.
    pub due_today: usize,
    /// Unfinished tasks past their due date.
    pub overdue: usize,
    /// Blocked tasks.
    pub blocked: usize,
    /// Tasks due within the upcoming window.
    pub upcoming: usize,
}

/// Task counts per status and per priority.
///
/// Both maps always hold every key, zero when no task matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distributions {
    /// Count per status.
    pub status: BTreeMap<TaskStatus, usize>,
    /// Count per priority.
    pub priority: BTreeMap<Priority, usize>,
}

impl Distributions {
    fn count(tasks: &[Task]) -> Self {
        let mut status: BTreeMap<_, _> = TaskStatus::ALL.iter().map(|&key| (key, 0)).collect();
        let mut priority: BTreeMap<_, _> = Priority::ALL.iter().map(|&key| (key, 0)).collect();
        for task in tasks {
            *status.entry(task.status()).or_default() += 1;
            *priority.entry(task.priority()).or_default() += 1;
        }
        Self { status, priority }
    }
}

/// Read-only summary of a workspace's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardReport {
    /// Headline counts.
    pub metrics: DashboardMetrics,
    /// Status and priority distributions.
    pub distributions: Distributions,
    /// Alerts ordered danger, warning, info.
    pub alerts: Vec<Alert>,
    /// Tasks due today.
    pub today_tasks: Vec<Task>,
    /// Overdue tasks.
    pub overdue_tasks: Vec<Task>,
    /// Tasks in the upcoming window.
    pub upcoming_tasks: Vec<Task>,
    /// Blocked tasks.
    pub blocked_tasks: Vec<Task>,
}

impl DashboardReport {
    /// Builds the report over `tasks`.
    #[must_use]
    pub fn build(tasks: &[Task], query: &TemporalQuery, upcoming_days: u32) -> Self {
        let today_tasks = owned(query.due_today(tasks));
        let overdue_tasks = owned(query.overdue(tasks));
        let upcoming_tasks = owned(query.upcoming(tasks, upcoming_days));
        let blocked_tasks = owned(query.blocked(tasks));

        let metrics = DashboardMetrics {
            total: tasks.len(),
            due_today: today_tasks.len(),
            overdue: overdue_tasks.len(),
            blocked: blocked_tasks.len(),
            upcoming: upcoming_tasks.len(),
        };

        Self {
            alerts: alerts_for(&metrics),
            metrics,
            distributions: Distributions::count(tasks),
            today_tasks,
            overdue_tasks,
            upcoming_tasks,
            blocked_tasks,
        }
    }
}

fn alerts_for(metrics: &DashboardMetrics) -> Vec<Alert> {
    [
        (AlertLevel::Danger, metrics.overdue, "overdue"),
        (AlertLevel::Warning, metrics.blocked, "blocked"),
        (AlertLevel::Info, metrics.due_today, "due today"),
    ]
    .into_iter()
    .filter(|&(_, count, _)| count > 0)
    .map(|(level, count, noun)| Alert::new(level, count, noun))
    .collect()
}

fn owned(tasks: Vec<&Task>) -> Vec<Task> {
    tasks.into_iter().cloned().collect()
}

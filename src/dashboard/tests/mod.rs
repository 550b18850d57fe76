//! Unit tests for the dashboard context.

mod service_tests;

use crate::{
    clock::FixedClock,
    workspace::domain::{NewTask, Task, TaskStatus},
};
use chrono::{DateTime, TimeZone, Utc};
use eyre::OptionExt;

/// Evaluation instant shared by the dashboard tests.
fn now() -> eyre::Result<DateTime<Utc>> {
    at(2024, 6, 10, 0)
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .ok_or_eyre("valid timestamp")
}

/// Builds a task due at `due` and walks it through `path`.
fn task_due(
    name: &str,
    due: Option<DateTime<Utc>>,
    path: &[TaskStatus],
    clock: &FixedClock,
) -> eyre::Result<Task> {
    let mut task = Task::new(NewTask::new(name).with_optional_due_date(due), clock)?;
    for &status in path {
        task.transition_to(status, clock)?;
    }
    Ok(task)
}

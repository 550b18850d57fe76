//! Tests for the dashboard service over the in-memory repository.

use super::{at, now};
use crate::{
    clock::FixedClock,
    dashboard::services::{DashboardError, DashboardService},
    workspace::{
        adapters::memory::InMemoryWorkspaceRepository,
        domain::{NewTask, Task, Workspace, WorkspaceId},
        ports::WorkspaceRepository,
    },
};
use eyre::ensure;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_workspace_is_reported() -> eyre::Result<()> {
    let repository = Arc::new(InMemoryWorkspaceRepository::new());
    let service = DashboardService::new(repository, Arc::new(FixedClock::new(now()?)));

    let result = service.build_dashboard(WorkspaceId::new()).await;

    ensure!(matches!(result, Err(DashboardError::WorkspaceNotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_counts_top_level_tasks_only() -> eyre::Result<()> {
    let clock = FixedClock::new(now()?);
    let repository = Arc::new(InMemoryWorkspaceRepository::new());
    let mut workspace = Workspace::new("Launch", &clock)?;
    let mut parent = Task::new(
        NewTask::new("Release").with_due_date(at(2024, 6, 10, 12)?),
        &clock,
    )?;
    parent.add_subtask(
        NewTask::new("Tag build").with_due_date(at(2024, 6, 10, 9)?),
        &clock,
    )?;
    workspace.add_task(parent, &clock)?;
    repository.save_workspace(&workspace).await?;
    let service = DashboardService::new(Arc::clone(&repository), Arc::new(clock))
        .with_upcoming_days(3);

    let report = service.build_dashboard(workspace.id()).await?;

    ensure!(report.metrics.total == 1);
    ensure!(report.metrics.due_today == 1);
    ensure!(report.today_tasks.iter().all(|task| task.name() == "Release"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upcoming_window_is_configurable() -> eyre::Result<()> {
    let clock = FixedClock::new(now()?);
    let repository = Arc::new(InMemoryWorkspaceRepository::new());
    let mut workspace = Workspace::new("Launch", &clock)?;
    workspace.add_task(
        Task::new(
            NewTask::new("Next week").with_due_date(at(2024, 6, 15, 12)?),
            &clock,
        )?,
        &clock,
    )?;
    repository.save_workspace(&workspace).await?;

    let narrow = DashboardService::new(Arc::clone(&repository), Arc::new(clock))
        .with_upcoming_days(3)
        .build_dashboard(workspace.id())
        .await?;
    let wide = DashboardService::new(repository, Arc::new(clock))
        .build_dashboard(workspace.id())
        .await?;

    ensure!(narrow.metrics.upcoming == 0);
    ensure!(wide.metrics.upcoming == 1);
    Ok(())
}

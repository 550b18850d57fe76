//! Integration tests for the workspace services over [`JsonWorkspaceStore`].
//!
//! Each test uses a fresh temporary data directory, drives the services
//! through the JSON store, and reopens the store to check what actually
//! reached the disk.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use taskdeck::{
    clock::FixedClock,
    workspace::{
        adapters::json::{JsonStoreOptions, JsonWorkspaceStore},
        domain::{NewTask, TaskStatus},
        services::{TaskService, WorkspaceService},
    },
};
use tempfile::TempDir;
use tokio::runtime::Runtime;

fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn data_dir(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(tmp.path().join("taskdeck")).expect("utf-8 temp path")
}

fn open_store(root: &Utf8Path) -> Arc<JsonWorkspaceStore<FixedClock>> {
    Arc::new(
        JsonWorkspaceStore::open(root, JsonStoreOptions::default(), FixedClock::new(instant()))
            .expect("open store"),
    )
}

/// Task state written through the services is read back after reopening.
#[test]
fn task_state_survives_reopening_the_store() {
    let rt = test_runtime();
    let tmp = TempDir::new().expect("temp dir");
    let root = data_dir(&tmp);
    let clock = Arc::new(FixedClock::new(instant()));

    let (ws, task_id) = rt.block_on(async {
        let store = open_store(&root);
        let workspaces = WorkspaceService::new(Arc::clone(&store), Arc::clone(&clock));
        let tasks = TaskService::new(store, Arc::clone(&clock));

        let ws = workspaces
            .create_workspace("Persistent")
            .await
            .expect("create workspace")
            .id();
        let task = tasks
            .create_task(ws, NewTask::new("Survive restart"))
            .await
            .expect("create task");
        tasks
            .update_status(ws, task.id(), TaskStatus::InProgress)
            .await
            .expect("start task");
        tasks
            .add_blocker(ws, task.id(), "Waiting on disk")
            .await
            .expect("block task");
        (ws, task.id())
    });

    rt.block_on(async {
        let tasks = TaskService::new(open_store(&root), Arc::clone(&clock));
        let reloaded = tasks.get_task(ws, task_id).await.expect("reload task");
        assert_eq!(reloaded.status(), TaskStatus::Blocked);
        assert_eq!(reloaded.blockers().len(), 1);
    });
}

/// Restoring the oldest backup undoes later service calls.
#[test]
fn restoring_a_backup_undoes_later_changes() {
    let rt = test_runtime();
    let tmp = TempDir::new().expect("temp dir");
    let root = data_dir(&tmp);
    let clock = Arc::new(FixedClock::new(instant()));

    rt.block_on(async {
        let store = open_store(&root);
        let workspaces = WorkspaceService::new(Arc::clone(&store), Arc::clone(&clock));

        let ws = workspaces
            .create_workspace("First draft")
            .await
            .expect("create workspace")
            .id();
        workspaces
            .rename_workspace(ws, "Renamed")
            .await
            .expect("rename");

        let backups = store.list_backups().await.expect("list backups");
        assert_eq!(backups.len(), 2);
        let oldest = backups.last().expect("oldest backup");
        store.restore_backup(oldest).await.expect("restore");

        let restored = workspaces.get_workspace(ws).await.expect("get workspace");
        assert_eq!(restored.name(), "First draft");
    });
}

//! Tests for the JSON document store and its backups.

use crate::{
    clock::FixedClock,
    workspace::{
        adapters::json::{JsonStoreOptions, JsonWorkspaceStore},
        domain::{NewTask, Task, TaskStatus, Workspace, WorkspaceId},
        ports::{WorkspaceRepository, WorkspaceRepositoryError},
    },
};
use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use eyre::{OptionExt, bail, ensure};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct StoreDir {
    _tmp: TempDir,
    root: Utf8PathBuf,
    clock: FixedClock,
}

impl StoreDir {
    fn open(&self, max_backups: usize) -> eyre::Result<JsonWorkspaceStore<FixedClock>> {
        Ok(JsonWorkspaceStore::open(
            &self.root,
            JsonStoreOptions { max_backups },
            self.clock,
        )?)
    }

    fn document(&self) -> eyre::Result<String> {
        Ok(std::fs::read_to_string(self.root.join("workspaces.json"))?)
    }
}

#[fixture]
fn store_dir() -> eyre::Result<StoreDir> {
    let tmp = TempDir::new()?;
    let root = Utf8PathBuf::try_from(tmp.path().join("data"))?;
    let instant = Utc
        .with_ymd_and_hms(2024, 6, 10, 0, 0, 0)
        .single()
        .ok_or_eyre("valid instant")?;
    Ok(StoreDir {
        _tmp: tmp,
        root,
        clock: FixedClock::new(instant),
    })
}

fn workspace_with_task(name: &str, clock: &FixedClock) -> eyre::Result<Workspace> {
    let mut workspace = Workspace::new(name, clock)?;
    let mut task = Task::new(NewTask::new("Ship build"), clock)?;
    task.transition_to(TaskStatus::InProgress, clock)?;
    task.add_comment("Started", clock)?;
    task.add_subtask(NewTask::new("Write notes"), clock)?;
    workspace.add_task(task, clock)?;
    Ok(workspace)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_creates_an_empty_document(store_dir: eyre::Result<StoreDir>) -> eyre::Result<()> {
    let dir = store_dir?;

    let store = dir.open(5)?;

    ensure!(dir.root.join("backups").is_dir());
    ensure!(store.list_workspaces().await?.is_empty());
    ensure!(store.list_backups().await?.is_empty());
    ensure!(dir.document()?.contains("\"version\": 1"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saved_workspaces_survive_reopening(store_dir: eyre::Result<StoreDir>) -> eyre::Result<()> {
    let dir = store_dir?;
    let workspace = workspace_with_task("Launch", &dir.clock)?;
    dir.open(5)?.save_workspace(&workspace).await?;

    let reopened = dir.open(5)?;

    ensure!(reopened.get_workspace(workspace.id()).await? == Some(workspace.clone()));
    ensure!(reopened.list_workspaces().await? == vec![workspace]);
    ensure!(dir.document()?.contains("\"status\": \"andamento\""));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_replaces_by_identifier(store_dir: eyre::Result<StoreDir>) -> eyre::Result<()> {
    let dir = store_dir?;
    let store = dir.open(5)?;
    let mut workspace = workspace_with_task("Launch", &dir.clock)?;
    store.save_workspace(&workspace).await?;

    workspace.rename("Relaunch", &dir.clock)?;
    store.save_workspace(&workspace).await?;

    let stored = store.list_workspaces().await?;
    ensure!(stored.len() == 1);
    ensure!(stored.iter().all(|candidate| candidate.name() == "Relaunch"));
    Ok(())
}

#[rstest]
#[case("not json at all")]
#[case(r#"{"version": 2, "last_updated": "2024-06-10T00:00:00Z", "workspaces": []}"#)]
#[tokio::test(flavor = "multi_thread")]
async fn unreadable_document_is_reported_as_corrupt(
    store_dir: eyre::Result<StoreDir>,
    #[case] contents: &str,
) -> eyre::Result<()> {
    let dir = store_dir?;
    let store = dir.open(5)?;
    std::fs::write(dir.root.join("workspaces.json"), contents)?;

    let result = store.list_workspaces().await;

    let Err(WorkspaceRepositoryError::Corrupt(_)) = result else {
        bail!("expected a corrupt store error");
    };
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backups_rotate_to_the_configured_limit(
    store_dir: eyre::Result<StoreDir>,
) -> eyre::Result<()> {
    let dir = store_dir?;
    let store = dir.open(2)?;
    let mut workspace = Workspace::new("Launch", &dir.clock)?;

    for round in 0..4 {
        workspace.rename(format!("Launch {round}"), &dir.clock)?;
        store.save_workspace(&workspace).await?;
    }

    let backups = store.list_backups().await?;
    ensure!(backups.len() == 2, "kept {backups:?}");
    let kept = backups
        .iter()
        .map(|name| std::fs::read_to_string(dir.root.join("backups").join(name)))
        .collect::<Result<Vec<_>, _>>()?;
    let [newest, previous] = kept.as_slice() else {
        bail!("expected two snapshots");
    };
    ensure!(newest.contains("Launch 3"), "newest snapshot holds the last save");
    ensure!(previous.contains("Launch 2"), "older snapshot holds the save before");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_brings_back_an_older_document(
    store_dir: eyre::Result<StoreDir>,
) -> eyre::Result<()> {
    let dir = store_dir?;
    let store = dir.open(5)?;
    let alpha = Workspace::new("Alpha", &dir.clock)?;
    let beta = Workspace::new("Beta", &dir.clock)?;
    store.save_workspace(&alpha).await?;
    store.save_workspace(&beta).await?;
    let oldest = store
        .list_backups()
        .await?
        .last()
        .cloned()
        .ok_or_eyre("a backup exists")?;

    store.restore_backup(&oldest).await?;

    ensure!(store.list_workspaces().await? == vec![alpha]);
    let backups = store.list_backups().await?;
    ensure!(backups.len() == 4, "pre-restore and restored snapshots are kept");
    Ok(())
}

#[rstest]
#[case("backup-missing.json")]
#[case("../workspaces.json")]
#[tokio::test(flavor = "multi_thread")]
async fn restore_rejects_unknown_backups(
    store_dir: eyre::Result<StoreDir>,
    #[case] name: &str,
) -> eyre::Result<()> {
    let dir = store_dir?;
    let store = dir.open(5)?;
    let before = dir.document()?;

    let result = store.restore_backup(name).await;

    let Err(WorkspaceRepositoryError::BackupNotFound(missing)) = result else {
        bail!("expected backup not found");
    };
    ensure!(missing == name);
    ensure!(dir.document()? == before);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_absent_workspace_writes_nothing(
    store_dir: eyre::Result<StoreDir>,
) -> eyre::Result<()> {
    let dir = store_dir?;
    let store = dir.open(5)?;
    let workspace = Workspace::new("Launch", &dir.clock)?;
    store.save_workspace(&workspace).await?;

    ensure!(!store.delete_workspace(WorkspaceId::new()).await?);
    ensure!(store.list_backups().await?.len() == 1);

    ensure!(store.delete_workspace(workspace.id()).await?);
    ensure!(store.list_workspaces().await?.is_empty());
    ensure!(store.list_backups().await?.len() == 2);
    Ok(())
}

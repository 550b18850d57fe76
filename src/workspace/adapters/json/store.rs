//! JSON file repository implementation.

use super::{
    backup::{self, BACKUP_DIR},
    document::{self, DOCUMENT_FILE, StoreDocument},
};
use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Tuning knobs for [`JsonWorkspaceStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonStoreOptions {
    /// Number of snapshots kept in `backups/`. Zero keeps none, including
    /// the snapshot of the write just made.
    pub max_backups: usize,
}

impl JsonStoreOptions {
    /// Snapshot count used when none is configured.
    pub const DEFAULT_MAX_BACKUPS: usize = 5;
}

impl Default for JsonStoreOptions {
    fn default() -> Self {
        Self {
            max_backups: Self::DEFAULT_MAX_BACKUPS,
        }
    }
}

/// Workspace repository backed by a single JSON document.
///
/// Writers inside one process are serialised. Separate processes writing the
/// same directory are not coordinated and the last write wins.
pub struct JsonWorkspaceStore<C = DefaultClock> {
    inner: Arc<StoreInner<C>>,
}

struct StoreInner<C> {
    dir: Dir,
    clock: C,
    max_backups: usize,
    write_lock: Mutex<()>,
}

impl<C> Clone for JsonWorkspaceStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> JsonWorkspaceStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Opens the store rooted at `root`, creating the directory layout and an
    /// empty document when missing.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::Persistence`] when the directories
    /// or the initial document cannot be created.
    pub fn open(
        root: &Utf8Path,
        options: JsonStoreOptions,
        clock: C,
    ) -> WorkspaceRepositoryResult<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(WorkspaceRepositoryError::persistence)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(WorkspaceRepositoryError::persistence)?;
        dir.create_dir_all(BACKUP_DIR)
            .map_err(WorkspaceRepositoryError::persistence)?;

        if !dir.exists(DOCUMENT_FILE) {
            let empty = StoreDocument::empty(clock.utc());
            document::replace_document(&dir, &document::encode(&empty)?)?;
            info!(root = %root, "initialised empty workspace store");
        }
        debug!(root = %root, max_backups = options.max_backups, "opened workspace store");

        Ok(Self {
            inner: Arc::new(StoreInner {
                dir,
                clock,
                max_backups: options.max_backups,
                write_lock: Mutex::new(()),
            }),
        })
    }

    /// Returns the snapshot names, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::Persistence`] when the backup
    /// directory cannot be read.
    pub async fn list_backups(&self) -> WorkspaceRepositoryResult<Vec<String>> {
        self.run_blocking(|inner| {
            backup::list(&inner.dir).map_err(WorkspaceRepositoryError::persistence)
        })
        .await
    }

    /// Replaces the document with the snapshot `name`.
    ///
    /// The current document is snapshotted first, so a restore can itself be
    /// undone.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::BackupNotFound`] for unknown names
    /// and [`WorkspaceRepositoryError::Corrupt`] when the snapshot does not
    /// decode.
    pub async fn restore_backup(&self, name: &str) -> WorkspaceRepositoryResult<()> {
        let backup_name = name.to_owned();
        self.run_blocking(move |inner| {
            let _guard = inner.lock()?;
            let mut restored = document::decode(&backup::read(&inner.dir, &backup_name)?)?;
            let current = inner
                .dir
                .read_to_string(DOCUMENT_FILE)
                .map_err(WorkspaceRepositoryError::persistence)?;
            inner.snapshot(&current);
            inner.commit(&mut restored)?;
            info!(backup = %backup_name, "restored workspace store from backup");
            Ok(())
        })
        .await
    }

    /// Runs blocking file I/O off the async executor.
    async fn run_blocking<F, T>(&self, f: F) -> WorkspaceRepositoryResult<T>
    where
        F: FnOnce(&StoreInner<C>) -> WorkspaceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&inner))
            .await
            .map_err(WorkspaceRepositoryError::persistence)?
    }
}

impl<C> StoreInner<C>
where
    C: Clock,
{
    fn lock(&self) -> WorkspaceRepositoryResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Stamps, writes, and snapshots `document`. Callers hold the write lock.
    fn commit(&self, document: &mut StoreDocument) -> WorkspaceRepositoryResult<()> {
        document.last_updated = self.clock.utc();
        let contents = document::encode(document)?;
        document::replace_document(&self.dir, &contents)?;
        self.snapshot(&contents);
        Ok(())
    }

    /// Writes a snapshot; failures are logged and never fail the caller.
    fn snapshot(&self, contents: &str) {
        match backup::snapshot(&self.dir, contents, self.clock.utc(), self.max_backups) {
            Ok(name) => debug!(backup = %name, "wrote workspace backup"),
            Err(err) => warn!(error = %err, "workspace backup failed"),
        }
    }
}

#[async_trait]
impl<C> WorkspaceRepository for JsonWorkspaceStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn get_workspace(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        self.run_blocking(move |inner| {
            let stored = document::read_document(&inner.dir)?;
            Ok(stored.find(id).cloned())
        })
        .await
    }

    async fn list_workspaces(&self) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        self.run_blocking(|inner| Ok(document::read_document(&inner.dir)?.workspaces))
            .await
    }

    async fn save_workspace(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let owned = workspace.clone();
        self.run_blocking(move |inner| {
            let _guard = inner.lock()?;
            let mut stored = document::read_document(&inner.dir)?;
            let workspace_id = owned.id();
            stored.upsert(owned);
            inner.commit(&mut stored)?;
            debug!(%workspace_id, "saved workspace");
            Ok(())
        })
        .await
    }

    async fn delete_workspace(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<bool> {
        self.run_blocking(move |inner| {
            let _guard = inner.lock()?;
            let mut stored = document::read_document(&inner.dir)?;
            if !stored.remove(id) {
                return Ok(false);
            }
            inner.commit(&mut stored)?;
            debug!(workspace_id = %id, "deleted workspace");
            Ok(true)
        })
        .await
    }
}

//! Repository port for whole-aggregate workspace persistence.

use crate::workspace::domain::{Workspace, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace repository operations.
pub type WorkspaceRepositoryResult<T> = Result<T, WorkspaceRepositoryError>;

/// Workspace persistence contract.
///
/// Workspaces are read and written as complete aggregates; there are no
/// partial updates. Implementations are not required to detect concurrent
/// writers: the last save wins.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Finds a workspace by identifier.
    ///
    /// Returns `None` when the workspace does not exist.
    async fn get_workspace(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>>;

    /// Returns every workspace in the order they were first saved.
    async fn list_workspaces(&self) -> WorkspaceRepositoryResult<Vec<Workspace>>;

    /// Inserts or replaces a workspace, matching on its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::Persistence`] when the backing
    /// store cannot be written.
    async fn save_workspace(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()>;

    /// Deletes a workspace.
    ///
    /// Returns whether a workspace was removed.
    async fn delete_workspace(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<bool>;
}

/// Errors returned by workspace repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceRepositoryError {
    /// The stored document could not be decoded.
    #[error("workspace store is corrupt: {0}")]
    Corrupt(String),

    /// The requested backup does not exist.
    #[error("backup not found: {0}")]
    BackupNotFound(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! In-memory repository for workspace tests and embedding.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};

/// Thread-safe in-memory workspace repository.
///
/// Workspaces keep the order in which they were first saved.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceRepository {
    state: Arc<RwLock<Vec<Workspace>>>,
}

impl InMemoryWorkspaceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(err: &PoisonError<T>) -> WorkspaceRepositoryError {
    WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaceRepository {
    async fn get_workspace(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.iter().find(|workspace| workspace.id() == id).cloned())
    }

    async fn list_workspaces(&self) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.clone())
    }

    async fn save_workspace(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        match state.iter_mut().find(|stored| stored.id() == workspace.id()) {
            Some(slot) => *slot = workspace.clone(),
            None => state.push(workspace.clone()),
        }
        Ok(())
    }

    async fn delete_workspace(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<bool> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let before = state.len();
        state.retain(|workspace| workspace.id() != id);
        Ok(state.len() != before)
    }
}

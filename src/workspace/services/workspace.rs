//! Workspace lifecycle service.

use super::{
    WorkspaceServiceError, WorkspaceServiceResult,
    unit_of_work::{load, modify},
};
use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::WorkspaceRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates, lists, renames, imports, and deletes workspaces.
#[derive(Clone)]
pub struct WorkspaceService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> WorkspaceService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new workspace service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and persists an empty workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Domain`] for a blank name, or
    /// [`WorkspaceServiceError::Repository`] when the save fails.
    pub async fn create_workspace(&self, name: &str) -> WorkspaceServiceResult<Workspace> {
        let workspace = Workspace::new(name, &*self.clock)?;
        self.repository.save_workspace(&workspace).await?;
        info!(workspace_id = %workspace.id(), name = workspace.name(), "created workspace");
        Ok(workspace)
    }

    /// Returns every stored workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Repository`] when the store cannot be
    /// read.
    pub async fn list_workspaces(&self) -> WorkspaceServiceResult<Vec<Workspace>> {
        let workspaces = self.repository.list_workspaces().await?;
        debug!(count = workspaces.len(), "listed workspaces");
        Ok(workspaces)
    }

    /// Returns one workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::WorkspaceNotFound`] when the
    /// identifier does not resolve.
    pub async fn get_workspace(&self, id: WorkspaceId) -> WorkspaceServiceResult<Workspace> {
        load(&*self.repository, id).await
    }

    /// Renames a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// identifiers and [`WorkspaceServiceError::Domain`] for a blank name.
    pub async fn rename_workspace(
        &self,
        id: WorkspaceId,
        name: &str,
    ) -> WorkspaceServiceResult<Workspace> {
        let clock = &*self.clock;
        let renamed = modify(&*self.repository, id, |workspace| {
            workspace.rename(name, clock)?;
            Ok(workspace.clone())
        })
        .await?;
        info!(workspace_id = %id, name = renamed.name(), "renamed workspace");
        Ok(renamed)
    }

    /// Deletes a workspace with all of its tasks and templates.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::WorkspaceNotFound`] when nothing was
    /// removed.
    pub async fn delete_workspace(&self, id: WorkspaceId) -> WorkspaceServiceResult<()> {
        if !self.repository.delete_workspace(id).await? {
            return Err(WorkspaceServiceError::WorkspaceNotFound(id));
        }
        info!(workspace_id = %id, "deleted workspace");
        Ok(())
    }

    /// Stores an externally supplied workspace, such as an exported file.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::DuplicateWorkspace`] when the
    /// identifier is already stored, and
    /// [`WorkspaceServiceError::Domain`] when task or template identifiers
    /// repeat or a subtask's parent link does not match its position.
    pub async fn import_workspace(&self, workspace: Workspace) -> WorkspaceServiceResult<Workspace> {
        if self.repository.get_workspace(workspace.id()).await?.is_some() {
            return Err(WorkspaceServiceError::DuplicateWorkspace(workspace.id()));
        }
        workspace.validate_structure()?;
        self.repository.save_workspace(&workspace).await?;
        info!(
            workspace_id = %workspace.id(),
            tasks = workspace.tasks().len(),
            "imported workspace"
        );
        Ok(workspace)
    }
}

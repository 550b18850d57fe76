//! Load-mutate-save helper shared by the workspace services.

use super::{WorkspaceServiceError, WorkspaceServiceResult};
use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::WorkspaceRepository,
};

/// Loads a workspace or reports it missing.
pub(super) async fn load<R>(repository: &R, id: WorkspaceId) -> WorkspaceServiceResult<Workspace>
where
    R: WorkspaceRepository + ?Sized,
{
    repository
        .get_workspace(id)
        .await?
        .ok_or(WorkspaceServiceError::WorkspaceNotFound(id))
}

/// Applies `apply` to an owned copy of the workspace and saves it only when
/// `apply` succeeds. A failed mutation leaves storage untouched.
pub(super) async fn modify<R, T>(
    repository: &R,
    id: WorkspaceId,
    apply: impl FnOnce(&mut Workspace) -> WorkspaceServiceResult<T> + Send,
) -> WorkspaceServiceResult<T>
where
    R: WorkspaceRepository + ?Sized,
{
    let mut workspace = load(repository, id).await?;
    let outcome = apply(&mut workspace)?;
    repository.save_workspace(&workspace).await?;
    Ok(outcome)
}

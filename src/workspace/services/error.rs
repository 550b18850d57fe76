//! Service-level errors for workspace orchestration.

use crate::workspace::{
    domain::{ValidationError, WorkspaceDomainError, WorkspaceId},
    ports::WorkspaceRepositoryError,
};
use thiserror::Error;

/// Errors returned by workspace, task, and template services.
#[derive(Debug, Error)]
pub enum WorkspaceServiceError {
    /// No workspace has the requested identifier.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),

    /// An imported workspace reuses an identifier that is already stored.
    #[error("workspace already exists: {0}")]
    DuplicateWorkspace(WorkspaceId),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkspaceRepositoryError),
}

impl From<ValidationError> for WorkspaceServiceError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(WorkspaceDomainError::Validation(err))
    }
}

/// Result type for workspace service operations.
pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

//! Dashboard assembly service.

use crate::{
    dashboard::domain::{DEFAULT_UPCOMING_DAYS, DashboardReport, TemporalQuery},
    workspace::{
        domain::WorkspaceId,
        ports::{WorkspaceRepository, WorkspaceRepositoryError},
    },
};
use chrono::{FixedOffset, Offset, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for dashboard assembly.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// No workspace has the requested identifier.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkspaceRepositoryError),
}

/// Result type for dashboard service operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Builds read-only dashboard reports.
#[derive(Clone)]
pub struct DashboardService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    offset: FixedOffset,
    upcoming_days: u32,
}

impl<R, C> DashboardService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a dashboard service using UTC calendar days and a seven day
    /// upcoming window.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            offset: Utc.fix(),
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }

    /// Sets the offset that defines calendar days.
    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the upcoming window in days.
    #[must_use]
    pub const fn with_upcoming_days(mut self, days: u32) -> Self {
        self.upcoming_days = days;
        self
    }

    /// Builds the dashboard for a workspace's top-level tasks.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::WorkspaceNotFound`] when the identifier does
    /// not resolve and [`DashboardError::Repository`] when loading fails.
    pub async fn build_dashboard(&self, workspace_id: WorkspaceId) -> DashboardResult<DashboardReport> {
        let workspace = self
            .repository
            .get_workspace(workspace_id)
            .await?
            .ok_or(DashboardError::WorkspaceNotFound(workspace_id))?;
        let query = TemporalQuery::at(&*self.clock, self.offset);
        let report = DashboardReport::build(workspace.tasks(), &query, self.upcoming_days);
        debug!(
            %workspace_id,
            total = report.metrics.total,
            overdue = report.metrics.overdue,
            blocked = report.metrics.blocked,
            "built dashboard"
        );
        Ok(report)
    }
}

//! Wiring of the store, services, and session for one invocation.

use crate::session::Session;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, Local, Utc};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use taskdeck::{
    clock::FixedClock,
    config::Settings,
    dashboard::services::DashboardService,
    workspace::{
        adapters::json::{JsonStoreOptions, JsonWorkspaceStore},
        domain::WorkspaceId,
        services::{TaskService, TemplateService, WorkspaceService},
    },
};

/// System clock, or a frozen instant from `--now`.
#[derive(Debug, Clone, Copy)]
pub enum AppClock {
    /// Wall-clock time.
    System,
    /// Frozen instant.
    Fixed(FixedClock),
}

impl AppClock {
    /// Chooses a fixed clock when `now` is given.
    #[must_use]
    pub fn from_override(now: Option<DateTime<Utc>>) -> Self {
        now.map_or(Self::System, |instant| Self::Fixed(FixedClock::new(instant)))
    }
}

impl Clock for AppClock {
    fn local(&self) -> DateTime<Local> {
        match self {
            Self::System => DefaultClock.local(),
            Self::Fixed(clock) => clock.local(),
        }
    }

    fn utc(&self) -> DateTime<Utc> {
        match self {
            Self::System => DefaultClock.utc(),
            Self::Fixed(clock) => clock.utc(),
        }
    }
}

type Store = JsonWorkspaceStore<AppClock>;

/// Services and state shared by every command handler.
pub struct App {
    pub store: Arc<Store>,
    pub workspaces: WorkspaceService<Store, AppClock>,
    pub tasks: TaskService<Store, AppClock>,
    pub templates: TemplateService<Store, AppClock>,
    pub dashboard: DashboardService<Store, AppClock>,
    pub session: Session,
    pub offset: FixedOffset,
    pub clock: AppClock,
    selected: Option<WorkspaceId>,
}

impl App {
    /// Opens the store in the configured data directory.
    pub fn open(settings: &Settings, clock: AppClock, selected: Option<WorkspaceId>) -> Result<Self> {
        let offset = settings.offset()?;
        let options = JsonStoreOptions {
            max_backups: settings.max_backups,
        };
        let store = Arc::new(
            JsonWorkspaceStore::open(&settings.data_dir, options, clock)
                .with_context(|| format!("open workspace store in {}", settings.data_dir))?,
        );
        let shared_clock = Arc::new(clock);
        Ok(Self {
            workspaces: WorkspaceService::new(Arc::clone(&store), Arc::clone(&shared_clock)),
            tasks: TaskService::new(Arc::clone(&store), Arc::clone(&shared_clock))
                .with_offset(offset),
            templates: TemplateService::new(Arc::clone(&store), Arc::clone(&shared_clock)),
            dashboard: DashboardService::new(Arc::clone(&store), shared_clock)
                .with_offset(offset)
                .with_upcoming_days(settings.upcoming_days),
            session: Session::open(&settings.data_dir)?,
            store,
            offset,
            clock,
            selected,
        })
    }

    /// Returns the workspace named by `--workspace`, or the active one.
    pub fn workspace_id(&self) -> Result<WorkspaceId> {
        if let Some(id) = self.selected {
            return Ok(id);
        }
        self.session.active()?.ok_or_else(|| {
            anyhow!("no workspace selected; pass --workspace or run `taskdeck workspace use <id>`")
        })
    }
}

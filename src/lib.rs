//! Taskdeck: workspace and task management.
//!
//! This crate provides the task lifecycle engine, template instantiation,
//! and the due-date dashboard behind the `taskdeck` command-line tool.
//!
//! # Architecture
//!
//! Taskdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (JSON file, memory, CSV)
//! - **Services**: Load-mutate-save orchestration over the ports
//!
//! # Modules
//!
//! - [`workspace`]: Workspaces, tasks, blockers, templates, and storage
//! - [`dashboard`]: Temporal task queries and the aggregate dashboard report
//! - [`config`]: Runtime settings for the command-line front end
//! - [`clock`]: Clock implementations complementing [`mockable::DefaultClock`]

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod workspace;

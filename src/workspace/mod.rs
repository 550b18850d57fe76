//! Workspace and task lifecycle management for Taskdeck.
//!
//! A workspace is the aggregate root owning tasks and templates. Tasks move
//! through a validated status state machine, collect blockers that force
//! them into the blocked state, and can be derived from templates. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Due-date queries and the workspace dashboard.
//!
//! The dashboard is read-only: it loads a workspace through the
//! [`crate::workspace::ports::WorkspaceRepository`] port, evaluates the
//! temporal filters at the clock's current instant, and returns plain data
//! for rendering.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;

//! JSON document adapter for workspace persistence.
//!
//! All workspaces live in one `workspaces.json` document under the data
//! directory. Every write replaces the document atomically and then copies
//! it into `backups/`, keeping only the newest snapshots.

mod backup;
mod document;
mod store;

pub use store::{JsonStoreOptions, JsonWorkspaceStore};

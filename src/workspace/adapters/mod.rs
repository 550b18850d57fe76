//! Adapter implementations of the workspace repository port.
//!
//! - [`memory`]: process-local storage for tests and embedding
//! - [`json`]: a single JSON document on disk with rotating backups
//! - [`spreadsheet`]: CSV export and import of top-level tasks

pub mod json;
pub mod memory;
pub mod spreadsheet;

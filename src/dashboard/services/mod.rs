//! Application services for dashboard reporting.

mod dashboard;

pub use dashboard::{DashboardError, DashboardResult, DashboardService};

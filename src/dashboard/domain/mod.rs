//! Dashboard domain: temporal filters and the aggregate report.

mod report;
mod temporal;

pub use report::{Alert, AlertLevel, DashboardMetrics, DashboardReport, Distributions};
pub use temporal::{DEFAULT_UPCOMING_DAYS, TemporalQuery};

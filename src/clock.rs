//! Clock implementations complementing [`mockable::DefaultClock`].

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Clock frozen at a single instant.
///
/// Used by tests and by the command-line `--now` override to evaluate
/// due-date queries at a chosen moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Creates a clock that always reports `instant`.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

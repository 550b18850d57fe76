//! Date-based task filters.

use crate::workspace::domain::{Priority, Task, TaskStatus};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use mockable::Clock;

/// Window used for upcoming tasks when none is configured.
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

/// Pure task filters evaluated against a fixed instant.
///
/// `offset` decides where calendar days begin, so "today" for a user at
/// UTC-03:00 differs from "today" in UTC. Tasks without a due date never
/// match a date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalQuery {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl TemporalQuery {
    /// Creates a query evaluated at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Creates a query evaluated at the clock's current time.
    #[must_use]
    pub fn at(clock: &impl Clock, offset: FixedOffset) -> Self {
        Self::new(clock.utc(), offset)
    }

    /// Returns the evaluation instant.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Returns the calendar offset.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns the calendar date of `now` in the configured offset.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    /// Tasks whose due date falls on today's calendar date.
    #[must_use]
    pub fn due_today<'t>(&self, tasks: &'t [Task]) -> Vec<&'t Task> {
        self.on_date(tasks, self.today())
    }

    /// Unfinished tasks whose due date is before `now`.
    #[must_use]
    pub fn overdue<'t>(&self, tasks: &'t [Task]) -> Vec<&'t Task> {
        select(tasks, |task| {
            task.status() != TaskStatus::Done && task.due_date().is_some_and(|due| due < self.now)
        })
    }

    /// Tasks due after tomorrow's instant and no later than `window_days`
    /// from now.
    ///
    /// A window of one day or less is always empty.
    #[must_use]
    pub fn upcoming<'t>(&self, tasks: &'t [Task], window_days: u32) -> Vec<&'t Task> {
        let (Some(start), Some(end)) = (self.shifted(1), self.shifted(window_days)) else {
            return Vec::new();
        };
        select(tasks, |task| {
            task.due_date().is_some_and(|due| start < due && due <= end)
        })
    }

    /// Tasks currently blocked.
    #[must_use]
    #[expect(clippy::unused_self, reason = "kept alongside the date filters")]
    pub fn blocked<'t>(&self, tasks: &'t [Task]) -> Vec<&'t Task> {
        select(tasks, |task| task.status() == TaskStatus::Blocked)
    }

    /// Tasks due between `start` and `days` days later, both ends included.
    #[must_use]
    pub fn by_date_range<'t>(
        &self,
        tasks: &'t [Task],
        start: DateTime<Utc>,
        days: u32,
    ) -> Vec<&'t Task> {
        let Some(end) = add_days(start, days) else {
            return Vec::new();
        };
        select(tasks, |task| {
            task.due_date().is_some_and(|due| start <= due && due <= end)
        })
    }

    /// Tasks with exactly `priority`.
    #[must_use]
    #[expect(clippy::unused_self, reason = "kept alongside the date filters")]
    pub fn by_priority<'t>(&self, tasks: &'t [Task], priority: Priority) -> Vec<&'t Task> {
        select(tasks, |task| task.priority() == priority)
    }

    /// Tasks whose due date falls on `date` in the configured offset.
    #[must_use]
    pub fn on_date<'t>(&self, tasks: &'t [Task], date: NaiveDate) -> Vec<&'t Task> {
        select(tasks, |task| {
            task.due_date().is_some_and(|due| self.local_date(due) == date)
        })
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    fn shifted(&self, days: u32) -> Option<DateTime<Utc>> {
        add_days(self.now, days)
    }
}

fn add_days(instant: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    TimeDelta::try_days(i64::from(days)).and_then(|delta| instant.checked_add_signed(delta))
}

fn select(tasks: &[Task], predicate: impl Fn(&Task) -> bool) -> Vec<&Task> {
    tasks.iter().filter(|&task| predicate(task)).collect()
}

//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a settable instant so date-dependent rules are repeatable.
///
/// # Examples
/// ```
/// use mockable::Clock;
/// use userbase::test_support::MutableClock;
///
/// let clock = MutableClock::on(2026, 10, 18);
/// clock.advance_days(1);
/// assert_eq!(clock.utc().date_naive().to_string(), "2026-10-19");
/// ```
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Pin the clock to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Pin the clock to noon UTC on the given calendar date.
    ///
    /// # Panics
    /// Panics when the date does not exist.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let now = match Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single() {
            Some(now) => now,
            None => panic!("invalid clock date {year}-{month}-{day}"),
        };
        Self::new(now)
    }

    /// Current calendar date in UTC.
    pub fn today(&self) -> NaiveDate {
        self.lock_clock().date_naive()
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        *self.lock_clock() += TimeDelta::days(days);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

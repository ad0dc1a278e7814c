//! Minimum-age admission policy.
//!
//! The check compares calendar years only: someone born on 31 December
//! passes an 18-year threshold on 1 January of the year they would turn 18.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Configured minimum age, in whole calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinimumAge(u32);

impl MinimumAge {
    /// Threshold applied when configuration does not override it.
    pub const DEFAULT: Self = Self(18);

    /// Wrap a threshold in years.
    #[must_use]
    pub const fn new(years: u32) -> Self {
        Self(years)
    }

    /// Threshold in years.
    #[must_use]
    pub const fn years(self) -> u32 {
        self.0
    }

    /// Whether `birth_date` satisfies the threshold on `today`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use userbase::domain::MinimumAge;
    ///
    /// let today = NaiveDate::from_ymd_opt(2018, 1, 1).expect("date");
    /// let born = NaiveDate::from_ymd_opt(2000, 12, 31).expect("date");
    /// assert!(MinimumAge::new(18).permits(born, today));
    /// ```
    #[must_use]
    pub fn permits(self, birth_date: NaiveDate, today: NaiveDate) -> bool {
        let years = i64::from(today.year()) - i64::from(birth_date.year());
        years >= i64::from(self.0)
    }
}

impl Default for MinimumAge {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MinimumAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

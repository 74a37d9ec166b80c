//! Calendar date ranges for historical queries.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::DateRangeError;

/// A range of calendar dates for historical data retrieval.
///
/// The only way to build a range is through a validating constructor, so a
/// `DateRange` always satisfies `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or start > end.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| DateRangeError::InvalidDate(s.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Creates the range covering the `days` days that end on `end`.
    ///
    /// `last_days(d, 7)` spans from `d - 7` to `d`.
    ///
    /// # Errors
    ///
    /// Returns an error if the start date would fall outside chrono's
    /// supported calendar.
    pub fn last_days(end: NaiveDate, days: u32) -> Result<Self, DateRangeError> {
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| DateRangeError::InvalidDate(format!("{end} - {days} days")))?;
        Self::new(start, end)
    }

    /// Returns the start date (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the end date (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the span of the range in whole days (`end - start`).
    ///
    /// A single-day range has a span of 0.
    #[must_use]
    pub fn span_days(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days()).unwrap_or(u32::MAX)
    }

    /// Returns the total number of calendar days in the range.
    #[must_use]
    pub fn total_days(&self) -> u64 {
        u64::from(self.span_days()) + 1
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

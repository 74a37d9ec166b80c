//! Sample interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sample granularity requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// One sample per minute.
    Minute,
    /// One sample per hour.
    Hourly,
    /// One sample per day.
    #[default]
    Daily,
    /// One sample per week.
    Weekly,
    /// One sample per month.
    Monthly,
}

impl Interval {
    /// Returns the interval as the backend's query parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Returns the approximate number of records per calendar day.
    #[must_use]
    pub const fn records_per_day(&self) -> f64 {
        match self {
            Self::Minute => 1440.0,
            Self::Hourly => 24.0,
            Self::Daily => 1.0,
            Self::Weekly => 1.0 / 7.0,
            Self::Monthly => 1.0 / 30.0,
        }
    }

    /// Returns all available intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute,
            Self::Hourly,
            Self::Daily,
            Self::Weekly,
            Self::Monthly,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minute" | "1m" | "m1" => Ok(Self::Minute),
            "hourly" | "hour" | "1h" | "h1" => Ok(Self::Hourly),
            "daily" | "day" | "1d" | "d1" => Ok(Self::Daily),
            "weekly" | "week" | "1w" | "w1" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: minute, hourly, daily, weekly, monthly",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}

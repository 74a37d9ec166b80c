//! Backend endpoint classes for historical price queries.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Historical price endpoint class.
///
/// Each variant names a backend aggregation window. Variants are ordered by
/// the amount of data the backend aggregates, so `PastDay < PastYear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Last 24 hours of data.
    PastDay,
    /// Last 7 days of data.
    PastWeek,
    /// Last 30 days of data.
    PastMonth,
    /// Last 365 days of data.
    PastYear,
}

impl Endpoint {
    /// Returns the endpoint name as used in the REST path.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PastDay => "past_day",
            Self::PastWeek => "past_week",
            Self::PastMonth => "past_month",
            Self::PastYear => "past_year",
        }
    }

    /// Returns the REST path for this endpoint, relative to the API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::PastDay => "/v1/prices/past_day",
            Self::PastWeek => "/v1/prices/past_week",
            Self::PastMonth => "/v1/prices/past_month",
            Self::PastYear => "/v1/prices/past_year",
        }
    }

    /// Returns all endpoint classes, narrowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::PastDay, Self::PastWeek, Self::PastMonth, Self::PastYear]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches("/v1/prices/").to_lowercase();
        match name.as_str() {
            "past_day" | "day" => Ok(Self::PastDay),
            "past_week" | "week" => Ok(Self::PastWeek),
            "past_month" | "month" => Ok(Self::PastMonth),
            "past_year" | "year" => Ok(Self::PastYear),
            _ => Err(EndpointParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid endpoint string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointParseError(String);

impl std::fmt::Display for EndpointParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid endpoint '{}', expected one of: past_day, past_week, past_month, past_year",
            self.0
        )
    }
}

impl std::error::Error for EndpointParseError {}

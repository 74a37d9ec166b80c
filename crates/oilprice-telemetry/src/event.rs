//! Telemetry event records.

use std::time::Duration;

use chrono::{DateTime, Utc};
use oilprice_types::Endpoint;
use serde::Serialize;

/// Outcome of one client call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    /// Operation name, e.g. `historical.get`.
    pub operation: &'static str,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Whether the call succeeded.
    pub success: bool,
    /// Error class name on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    /// Endpoint class used, if planning got that far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_used: Option<Endpoint>,
    /// Pages fetched.
    pub pages: u32,
    /// Records fetched.
    pub records: usize,
    /// When the call finished.
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    fn new(operation: &'static str, duration: Duration, success: bool) -> Self {
        Self {
            operation,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            success,
            error_type: None,
            endpoint_used: None,
            pages: 0,
            records: 0,
            timestamp: Utc::now(),
        }
    }

    /// A successful call.
    #[must_use]
    pub fn success(operation: &'static str, duration: Duration) -> Self {
        Self::new(operation, duration, true)
    }

    /// A failed call with its error class.
    #[must_use]
    pub fn failure(operation: &'static str, duration: Duration, error_type: &'static str) -> Self {
        Self {
            error_type: Some(error_type),
            ..Self::new(operation, duration, false)
        }
    }

    /// Sets the endpoint used.
    #[must_use]
    pub const fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint_used = Some(endpoint);
        self
    }

    /// Sets the page and record counts.
    #[must_use]
    pub const fn with_counts(mut self, pages: u32, records: usize) -> Self {
        self.pages = pages;
        self.records = records;
        self
    }

    /// Returns the duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

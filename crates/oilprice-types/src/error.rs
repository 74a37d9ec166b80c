//! Error types for oilprice.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for oilprice operations.
pub type Result<T> = std::result::Result<T, OilPriceError>;

/// Errors that can occur while planning and executing historical queries.
#[derive(Error, Debug)]
pub enum OilPriceError {
    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Page size outside the backend's accepted bounds.
    #[error("Invalid page size {page_size}: must be between 1 and {max}")]
    InvalidPageSize {
        /// The rejected page size.
        page_size: u32,
        /// The largest page size the backend accepts.
        max: u32,
    },

    /// Explicit request timeout of zero seconds.
    #[error("Invalid timeout: must be at least 1 second")]
    InvalidTimeout,

    /// Empty or malformed commodity code.
    #[error("Invalid commodity code: {0:?}")]
    InvalidCommodity(String),

    /// The same commodity was requested twice in one batch.
    #[error("Duplicate query for commodity {0}")]
    DuplicateQuery(String),

    /// Missing or invalid client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller cancelled the query or its deadline passed.
    #[error("Query {reason} before page {page}")]
    Cancelled {
        /// The page that was about to be requested.
        page: u32,
        /// Why the query stopped.
        reason: CancelReason,
    },

    /// A page could not be fetched and the query was abandoned.
    #[error("Fetching page {page} failed after {attempts} attempt(s): {source}")]
    FatalFetch {
        /// The page that failed.
        page: u32,
        /// Number of attempts made for that page.
        attempts: u32,
        /// The last transport error.
        #[source]
        source: FetchError,
    },
}

impl OilPriceError {
    /// Returns true for errors raised before any request was issued.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DateRange(_)
                | Self::InvalidPageSize { .. }
                | Self::InvalidTimeout
                | Self::InvalidCommodity(_)
                | Self::DuplicateQuery(_)
        )
    }

    /// Returns a short, data-free error type name suitable for telemetry.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::DateRange(_) => "InvalidRange",
            Self::InvalidPageSize { .. } => "InvalidPageSize",
            Self::InvalidTimeout => "InvalidTimeout",
            Self::InvalidCommodity(_) => "InvalidCommodity",
            Self::DuplicateQuery(_) => "DuplicateQuery",
            Self::Configuration(_) => "ConfigurationError",
            Self::Cancelled { .. } => "Cancelled",
            Self::FatalFetch { source, .. } => source.error_type(),
        }
    }
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// The range reaches further back than the configured lookback.
    #[error("Date range spans {span_days} days, exceeding the maximum lookback of {max_days}")]
    LookbackExceeded {
        /// Span of the requested range.
        span_days: u32,
        /// Configured maximum span.
        max_days: u32,
    },

    /// A date string could not be parsed.
    #[error("Invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Why a query stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// The caller cancelled explicitly.
    Cancelled,
    /// The caller-supplied deadline passed.
    DeadlineExceeded,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Errors reported by a page transport.
///
/// The transport classifies each failure; [`FetchError::is_transient`]
/// decides whether the page may be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request timed out.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established or was reset.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend is rate limiting this client.
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from the backend.
        message: String,
        /// Value of `X-RateLimit-Limit`, if sent.
        limit: Option<String>,
        /// Value of `X-RateLimit-Remaining`, if sent.
        remaining: Option<String>,
        /// Value of `X-RateLimit-Reset`, if sent.
        reset: Option<String>,
    },

    /// The backend returned a 5xx status.
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend.
        message: String,
    },

    /// The API key was rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The requested commodity or resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// 5xx statuses that are worth retrying.
    pub const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 503, 504];

    /// Returns true if the same request may succeed when retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) | Self::RateLimited { .. } => true,
            Self::Server { status, .. } => Self::RETRYABLE_STATUSES.contains(status),
            Self::Authentication(_) | Self::NotFound(_) | Self::Status { .. } | Self::Decode(_) => {
                false
            }
        }
    }

    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Server { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Authentication(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Timeout(_) | Self::Connection(_) | Self::Decode(_) => None,
        }
    }

    /// Returns a short, data-free error type name suitable for telemetry.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "TimeoutError",
            Self::Connection(_) => "ConnectionError",
            Self::RateLimited { .. } => "RateLimitError",
            Self::Server { .. } => "ServerError",
            Self::Authentication(_) => "AuthenticationError",
            Self::NotFound(_) => "DataNotFoundError",
            Self::Status { .. } => "StatusError",
            Self::Decode(_) => "DecodeError",
        }
    }
}

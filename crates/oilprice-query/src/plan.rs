//! Query planning: endpoint selection, timeouts and page sizing.

use std::time::Duration;

use oilprice_types::{DateRange, DateRangeError, Endpoint, Interval, OilPriceError, Result};
use serde::Serialize;

/// Largest page the backend returns.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Selects the narrowest endpoint whose window covers a span of `span_days`.
///
/// | span (days) | endpoint     |
/// |-------------|--------------|
/// | 0 ..= 1     | `past_day`   |
/// | 2 ..= 7     | `past_week`  |
/// | 8 ..= 30    | `past_month` |
/// | 31 ..       | `past_year`  |
///
/// # Example
///
/// ```
/// use oilprice_query::select_endpoint;
/// use oilprice_types::Endpoint;
///
/// assert_eq!(select_endpoint(7), Endpoint::PastWeek);
/// assert_eq!(select_endpoint(8), Endpoint::PastMonth);
/// ```
#[must_use]
pub const fn select_endpoint(span_days: u32) -> Endpoint {
    match span_days {
        0..=1 => Endpoint::PastDay,
        2..=7 => Endpoint::PastWeek,
        8..=30 => Endpoint::PastMonth,
        _ => Endpoint::PastYear,
    }
}

/// Returns the default request timeout for an endpoint class.
///
/// The values are floors based on observed P99 latencies and strictly
/// increase with the endpoint class.
#[must_use]
pub const fn default_timeout(endpoint: Endpoint) -> Duration {
    match endpoint {
        Endpoint::PastDay => Duration::from_secs(10),
        Endpoint::PastWeek => Duration::from_secs(30),
        Endpoint::PastMonth => Duration::from_secs(60),
        Endpoint::PastYear => Duration::from_secs(120),
    }
}

/// Caller-supplied overrides for a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanOptions {
    /// Records per page. Defaults to [`PlannerConfig::default_page_size`].
    pub page_size: Option<u32>,
    /// Request timeout in seconds, used verbatim when present.
    pub timeout_secs: Option<u64>,
    /// Sample interval requested from the backend.
    pub interval: Interval,
}

impl PlanOptions {
    /// Creates options with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets an explicit request timeout in seconds.
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Sets the sample interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }
}

/// Configuration for the query planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Largest page size accepted by the backend.
    pub max_page_size: u32,
    /// Page size used when the caller supplies none.
    pub default_page_size: u32,
    /// Longest span (in days) a query may cover, if limited.
    pub max_lookback_days: Option<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_page_size: MAX_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_lookback_days: None,
        }
    }
}

/// The plan for one historical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryPlan {
    /// Backend endpoint to query.
    pub endpoint: Endpoint,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Records requested per page.
    pub page_size: u32,
    /// Estimated number of pages. Advisory only.
    pub expected_page_count: u32,
}

impl QueryPlan {
    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (timeout {}s, {} per page, ~{} page(s))",
            self.endpoint, self.timeout_secs, self.page_size, self.expected_page_count
        )
    }
}

/// Maps date ranges to query plans.
///
/// Planning is a pure computation: it never performs I/O and every
/// validation error is reported before any request can be issued.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryPlanner {
    config: PlannerConfig,
}

impl QueryPlanner {
    /// Creates a planner with the given configuration.
    #[must_use]
    pub const fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Returns the planner configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans a query over `range`.
    ///
    /// # Errors
    ///
    /// Returns [`OilPriceError::DateRange`] if the span exceeds the configured
    /// lookback, [`OilPriceError::InvalidPageSize`] if the page size is outside
    /// `[1, max_page_size]`, and [`OilPriceError::InvalidTimeout`] for an
    /// explicit timeout of zero.
    pub fn plan(&self, range: &DateRange, options: &PlanOptions) -> Result<QueryPlan> {
        let span_days = range.span_days();
        if let Some(max_days) = self.config.max_lookback_days
            && span_days > max_days
        {
            return Err(DateRangeError::LookbackExceeded {
                span_days,
                max_days,
            }
            .into());
        }

        let page_size = self.validate_page_size(options.page_size)?;

        let endpoint = select_endpoint(span_days);
        let timeout_secs = match options.timeout_secs {
            Some(0) => return Err(OilPriceError::InvalidTimeout),
            Some(secs) => secs,
            None => default_timeout(endpoint).as_secs(),
        };

        Ok(QueryPlan {
            endpoint,
            timeout_secs,
            page_size,
            expected_page_count: expected_pages(range, options.interval, page_size),
        })
    }

    /// Resolves and validates the page size for a query.
    ///
    /// # Errors
    ///
    /// Returns [`OilPriceError::InvalidPageSize`] if the size is outside
    /// `[1, max_page_size]`.
    pub fn validate_page_size(&self, page_size: Option<u32>) -> Result<u32> {
        let size = page_size.unwrap_or(self.config.default_page_size);
        if size == 0 || size > self.config.max_page_size {
            return Err(OilPriceError::InvalidPageSize {
                page_size: size,
                max: self.config.max_page_size,
            });
        }
        Ok(size)
    }
}

/// Estimates how many pages a query will return.
fn expected_pages(range: &DateRange, interval: Interval, page_size: u32) -> u32 {
    let records = (range.total_days() as f64 * interval.records_per_day()).ceil();
    let pages = (records / f64::from(page_size)).ceil();
    (pages as u32).max(1)
}

//! Historical commodity price SDK with endpoint-aware query planning.
//!
//! This is a facade crate that re-exports functionality from the oilprice
//! workspace crates for convenient access.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/oilpriceapi/oilprice-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use oilprice_types::*;

pub use oilprice_commodities::CommodityRegistry;

pub use oilprice_query::{
    BatchResult, CancelToken, DEFAULT_PAGE_SIZE, HistoricalClient, HistoricalData,
    HistoricalOptions, HistoricalQuery, MAX_PAGE_SIZE, Page, PageFetcher, PageProgress,
    PageRequest, Paginator, PlanOptions, PlannerConfig, QueryPlan, QueryPlanner, RetryPolicy,
    default_timeout, fetch_many, normalize_commodity, select_endpoint,
};

pub use oilprice_telemetry::{
    MemorySink, NoopSink, Telemetry, TelemetryEvent, TelemetrySink, TracingSink,
};

#[cfg(feature = "http")]
pub use oilprice_fetch::{ClientConfig, HttpTransport, ParseError};

#[cfg(feature = "format")]
pub use oilprice_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat};

/// A [`HistoricalClient`] over the HTTP transport.
#[cfg(feature = "http")]
pub type OilPriceClient = HistoricalClient<HttpTransport>;

/// Builds an HTTP client from `OILPRICEAPI_KEY` and `OILPRICEAPI_BASE_URL`.
///
/// # Errors
///
/// Returns [`OilPriceError::Configuration`] if no API key is set.
#[cfg(feature = "http")]
pub fn client_from_env() -> Result<OilPriceClient> {
    Ok(HistoricalClient::new(HttpTransport::from_env()?))
}

/// Prelude module for convenient imports.
///
/// ```
/// use oilprice_lib::prelude::*;
/// ```
pub mod prelude {
    pub use oilprice_types::{
        Category, Commodity, DateRange, DateRangeError, Endpoint, FetchError, Interval,
        OilPriceError, PricePoint, Result,
    };

    pub use oilprice_commodities::CommodityRegistry;

    pub use oilprice_query::{
        CancelToken, HistoricalClient, HistoricalData, HistoricalOptions, HistoricalQuery,
        PageFetcher, QueryPlan, QueryPlanner, RetryPolicy,
    };

    pub use oilprice_telemetry::Telemetry;

    #[cfg(feature = "http")]
    pub use crate::{OilPriceClient, client_from_env};
    #[cfg(feature = "http")]
    pub use oilprice_fetch::{ClientConfig, HttpTransport};

    #[cfg(feature = "format")]
    pub use oilprice_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}

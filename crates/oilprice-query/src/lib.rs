//! Query planning and execution for historical commodity prices.
//!
//! - [`QueryPlanner`] - Chooses endpoint, timeout and page size for a range
//! - [`Paginator`] - Fetches the pages of one plan in order with retry
//! - [`HistoricalClient`] - Planning, pagination and telemetry over a [`PageFetcher`]
//! - [`fetch_many`] - Bounded fan-out across commodities

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/oilpriceapi/oilprice-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod driver;
mod fanout;
mod fetcher;
mod historical;
mod plan;
mod retry;

#[cfg(test)]
mod test_support;

pub use cancel::CancelToken;
pub use driver::{PageProgress, Paginator};
pub use fanout::{BatchResult, HistoricalQuery, fetch_many};
pub use fetcher::{Page, PageFetcher, PageRequest};
pub use historical::{HistoricalClient, HistoricalData, HistoricalOptions, normalize_commodity};
pub use plan::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PlanOptions, PlannerConfig, QueryPlan, QueryPlanner,
    default_timeout, select_endpoint,
};
pub use retry::RetryPolicy;

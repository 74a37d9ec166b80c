//! Core types for the oilprice historical commodity-price SDK.
//!
//! This crate provides the fundamental data structures used throughout oilprice:
//!
//! - [`DateRange`] - Validated calendar date range for historical queries
//! - [`Endpoint`] - Backend aggregation endpoint class (`past_day` .. `past_year`)
//! - [`Interval`] - Sample granularity requested from the backend
//! - [`PricePoint`] - A single historical price observation
//! - [`Commodity`] - Commodity metadata
//! - [`OilPriceError`] and [`FetchError`] - Error taxonomy

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/oilpriceapi/oilprice-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod commodity;
mod date_range;
mod endpoint;
mod error;
mod interval;
mod price;

pub use commodity::{Category, Commodity};
pub use date_range::DateRange;
pub use endpoint::{Endpoint, EndpointParseError};
pub use error::{CancelReason, DateRangeError, FetchError, OilPriceError, Result};
pub use interval::{Interval, IntervalParseError};
pub use price::PricePoint;

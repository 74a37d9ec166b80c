//! HTTP transport for the oilprice historical price API.
//!
//! - [`ClientConfig`] - Base URL, credentials and timeouts
//! - [`HttpTransport`] - [`PageFetcher`](oilprice_query::PageFetcher) over `reqwest`
//! - [`url::prices_url`] - Endpoint URL construction
//! - [`parse_page`] - Response body parsing

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/oilpriceapi/oilprice-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod parse;
pub mod url;

pub use client::HttpTransport;
pub use config::{API_KEY_ENV, BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
pub use parse::{ParseError, error_message, parse_page};

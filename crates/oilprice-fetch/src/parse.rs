//! Response body parsing.
//!
//! The API has returned three shapes over time, all accepted here:
//!
//! - `{"data": {"prices": [...]}, "meta": {...}}`
//! - `{"data": [...]}`
//! - a bare `[...]`

use chrono::{DateTime, Utc};
use oilprice_query::Page;
use oilprice_types::PricePoint;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors while decoding a response body.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Body is not valid JSON or has an unexpected shape.
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped {
        data: Data,
        #[serde(default)]
        meta: Option<Meta>,
    },
    Bare(Vec<RawPrice>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Data {
    Nested { prices: Vec<RawPrice> },
    List(Vec<RawPrice>),
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    has_next: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    commodity_name: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    price: f64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default, rename = "type")]
    price_type: Option<String>,
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Number(f64),
        Text(String),
    }

    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n),
        Value::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl RawPrice {
    fn into_point(self, fallback_code: &str) -> PricePoint {
        let code = self
            .code
            .or(self.commodity_name)
            .unwrap_or_else(|| fallback_code.to_string());
        let mut point = PricePoint::new(self.created_at, code, self.price);
        if let Some(unit) = self.unit {
            point.unit = unit;
        }
        if let Some(price_type) = self.price_type {
            point.price_type = price_type;
        }
        point
    }
}

/// Parses one page of prices.
///
/// `fallback_code` labels records that carry no code of their own. When the
/// body has a `meta` block its `has_next` flag (default `false`) becomes the
/// page's continuation signal; without one the page is unsignalled.
///
/// # Errors
///
/// Returns [`ParseError`] if the body matches none of the known shapes.
pub fn parse_page(body: &str, fallback_code: &str) -> Result<Page, ParseError> {
    let (raw, meta) = match serde_json::from_str(body)? {
        Envelope::Wrapped { data, meta } => {
            let prices = match data {
                Data::Nested { prices } | Data::List(prices) => prices,
            };
            (prices, meta)
        }
        Envelope::Bare(prices) => (prices, None),
    };

    let records = raw
        .into_iter()
        .map(|p| p.into_point(fallback_code))
        .collect();

    Ok(match meta {
        Some(meta) => Page::new(records, meta.has_next.unwrap_or(false)),
        None => Page::unsignalled(records),
    })
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts the message from an error body, falling back to the raw text.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.trim().to_string())
}

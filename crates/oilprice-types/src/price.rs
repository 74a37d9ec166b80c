//! Historical price representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single historical price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Timestamp of the observation (UTC).
    pub timestamp: DateTime<Utc>,
    /// Commodity code (e.g. `BRENT_CRUDE_USD`).
    pub code: String,
    /// Price value in the commodity's quote currency.
    pub value: f64,
    /// Unit of measure (e.g. `barrel`).
    pub unit: String,
    /// Price type (e.g. `spot_price`).
    pub price_type: String,
}

impl PricePoint {
    /// Default unit when the backend omits one.
    pub const DEFAULT_UNIT: &'static str = "barrel";

    /// Default price type when the backend omits one.
    pub const DEFAULT_PRICE_TYPE: &'static str = "spot_price";

    /// Creates a new spot price point with the default unit.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, code: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp,
            code: code.into(),
            value,
            unit: Self::DEFAULT_UNIT.to_string(),
            price_type: Self::DEFAULT_PRICE_TYPE.to_string(),
        }
    }

    /// Sets the unit of measure.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the price type.
    #[must_use]
    pub fn with_price_type(mut self, price_type: impl Into<String>) -> Self {
        self.price_type = price_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_price_point_defaults() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let point = PricePoint::new(ts, "BRENT_CRUDE_USD", 75.5);

        assert_eq!(point.code, "BRENT_CRUDE_USD");
        assert_eq!(point.unit, "barrel");
        assert_eq!(point.price_type, "spot_price");
        approx::assert_relative_eq!(point.value, 75.5);
    }

    #[test]
    fn test_price_point_builders() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let point = PricePoint::new(ts, "NATURAL_GAS_USD", 2.61)
            .with_unit("mmbtu")
            .with_price_type("futures");

        assert_eq!(point.unit, "mmbtu");
        assert_eq!(point.price_type, "futures");
    }
}

//! Commodity definitions.

use serde::{Deserialize, Serialize};

/// Commodity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Crude oil benchmarks.
    Crude,
    /// Natural gas and LNG.
    NaturalGas,
    /// Refined products (gasoline, diesel, jet fuel, heating oil).
    Refined,
    /// Coal.
    Coal,
    /// Marine bunker fuels.
    Marine,
    /// Currency and index series quoted alongside energy prices.
    Index,
}

impl Category {
    /// Returns the category as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crude => "crude",
            Self::NaturalGas => "natural_gas",
            Self::Refined => "refined",
            Self::Coal => "coal",
            Self::Marine => "marine",
            Self::Index => "index",
        }
    }

    /// Returns all categories.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Crude,
            Self::NaturalGas,
            Self::Refined,
            Self::Coal,
            Self::Marine,
            Self::Index,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A priced commodity known to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    /// Commodity code (e.g. `BRENT_CRUDE_USD`).
    code: String,
    /// Human-readable name (e.g. "Brent Crude Oil").
    name: String,
    /// Commodity category.
    category: Category,
    /// Unit of measure.
    unit: String,
    /// Quote currency.
    currency: String,
}

impl Commodity {
    /// Creates a new commodity.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        unit: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            unit: unit.into(),
            currency: currency.into(),
        }
    }

    /// Returns the commodity code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the commodity category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the unit of measure.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the quote currency.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl std::fmt::Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

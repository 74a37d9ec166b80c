//! Commodity registry for the oilprice SDK.
//!
//! # Example
//!
//! ```
//! use oilprice_commodities::CommodityRegistry;
//!
//! let registry = CommodityRegistry::global();
//! if let Some(brent) = registry.get("brent_crude_usd") {
//!     println!("{brent} is quoted per {}", brent.unit());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/oilpriceapi/oilprice-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use oilprice_types::{Category, Commodity};

/// The commodity metadata JSON embedded at compile time.
const COMMODITIES_JSON: &str = include_str!("../data/commodities.json");

static REGISTRY: OnceLock<CommodityRegistry> = OnceLock::new();

/// Registry of commodity codes known to the SDK, keyed by upper-case code.
#[derive(Debug, Default)]
pub struct CommodityRegistry {
    commodities: BTreeMap<String, Commodity>,
}

impl CommodityRegistry {
    /// Returns the global registry, loading it on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(|| {
            Self::from_json(COMMODITIES_JSON).unwrap_or_else(|err| {
                tracing::error!(error = %err, "embedded commodity list is invalid");
                Self::default()
            })
        })
    }

    /// Builds a registry from a JSON array of commodities.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid commodity list.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let list: Vec<Commodity> = serde_json::from_str(json)?;
        Ok(Self::from_iter(list))
    }

    /// Looks up a commodity by code (case-insensitive).
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Commodity> {
        self.commodities.get(&code.trim().to_ascii_uppercase())
    }

    /// Returns true if `code` is known.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Returns all commodities ordered by code.
    pub fn all(&self) -> impl Iterator<Item = &Commodity> {
        self.commodities.values()
    }

    /// Returns commodities in `category`, ordered by code.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Commodity> {
        self.commodities
            .values()
            .filter(move |c| c.category() == category)
    }

    /// Searches codes and names (case-insensitive).
    #[must_use]
    pub fn search(&self, pattern: &str) -> Vec<&Commodity> {
        let pattern = pattern.to_lowercase();
        self.commodities
            .values()
            .filter(|c| {
                c.code().to_lowercase().contains(&pattern)
                    || c.name().to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Number of known commodities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commodities.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }
}

impl FromIterator<Commodity> for CommodityRegistry {
    fn from_iter<I: IntoIterator<Item = Commodity>>(iter: I) -> Self {
        let commodities = iter
            .into_iter()
            .map(|c| (c.code().to_ascii_uppercase(), c))
            .collect();
        Self { commodities }
    }
}

//! Transport configuration.

use std::time::Duration;

use oilprice_types::{OilPriceError, PricePoint};

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.oilpriceapi.com";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OILPRICEAPI_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "OILPRICEAPI_BASE_URL";

/// Configuration for [`HttpTransport`](crate::HttpTransport).
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL, without a trailing `/v1`.
    pub base_url: String,
    /// API key sent as `Authorization: Token <key>`.
    pub api_key: String,
    /// Default request timeout, used when a request carries none.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Value of the `by_type` query parameter.
    pub price_type: String,
}

// Keep the key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .field("price_type", &self.price_type)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("oilprice-rust/{}", env!("CARGO_PKG_VERSION")),
            price_type: PricePoint::DEFAULT_PRICE_TYPE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with `api_key` and defaults for everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`OilPriceError::Configuration`] if no API key is set.
    pub fn from_env() -> Result<Self, OilPriceError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`OilPriceError::Configuration`] if no API key is found.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, OilPriceError> {
        let api_key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                OilPriceError::Configuration(format!(
                    "API key required. Set {API_KEY_ENV} or pass it explicitly"
                ))
            })?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        Ok(config)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `by_type` parameter.
    #[must_use]
    pub fn with_price_type(mut self, price_type: impl Into<String>) -> Self {
        self.price_type = price_type.into();
        self
    }
}

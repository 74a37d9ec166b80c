//! The page transport seam.

use std::time::Duration;

use async_trait::async_trait;
use oilprice_types::{DateRange, Endpoint, FetchError, Interval, PricePoint};

/// A single page request issued by the pagination driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    /// Commodity code.
    pub commodity: &'a str,
    /// Endpoint chosen by the planner.
    pub endpoint: Endpoint,
    /// Requested date range.
    pub range: DateRange,
    /// 1-based page cursor.
    pub page: u32,
    /// Records per page.
    pub page_size: u32,
    /// Sample interval.
    pub interval: Interval,
    /// Timeout for this request.
    pub timeout: Duration,
}

/// One page of results returned by a [`PageFetcher`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Records on this page, in backend order.
    pub records: Vec<PricePoint>,
    /// Explicit "more pages available" signal, if the backend sent one.
    pub has_more: Option<bool>,
}

impl Page {
    /// Creates a page with an explicit continuation signal.
    #[must_use]
    pub const fn new(records: Vec<PricePoint>, has_more: bool) -> Self {
        Self {
            records,
            has_more: Some(has_more),
        }
    }

    /// Creates a page without a continuation signal.
    #[must_use]
    pub const fn unsignalled(records: Vec<PricePoint>) -> Self {
        Self {
            records,
            has_more: None,
        }
    }

    /// Returns the number of records on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if another page should be requested after this one.
    ///
    /// An explicit backend signal wins. Without one, a full page means more
    /// data may follow. An empty page always ends pagination.
    #[must_use]
    pub fn continues(&self, page_size: u32) -> bool {
        if self.records.is_empty() {
            return false;
        }
        self.has_more
            .unwrap_or(self.records.len() >= page_size as usize)
    }
}

/// Transport capable of fetching one page of historical prices.
///
/// Implementations classify their own failures through [`FetchError`];
/// the driver decides whether to retry with [`FetchError::is_transient`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a single page.
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        (**self).fetch_page(request).await
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<F> {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        (**self).fetch_page(request).await
    }
}

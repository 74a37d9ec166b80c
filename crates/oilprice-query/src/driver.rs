//! Pagination driver.
//!
//! Pages for one commodity and date range are fetched strictly in order:
//! page `N + 1` is only requested once page `N` has been received. A
//! transient failure retries the same page; earlier pages are kept.

use futures::stream::{self, Stream};
use oilprice_types::{DateRange, FetchError, Interval, OilPriceError, PricePoint, Result};
use tracing::{debug, warn};

use crate::{CancelToken, Page, PageFetcher, PageRequest, QueryPlan, RetryPolicy};

/// Progress snapshot reported after each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// Pages received so far.
    pub pages: u32,
    /// Records received so far.
    pub records: usize,
    /// The plan's page estimate.
    pub expected_pages: u32,
}

type ProgressCallback<'a> = Box<dyn Fn(PageProgress) + Send + Sync + 'a>;

/// Drives pagination of a single planned query.
pub struct Paginator<'a, F: ?Sized> {
    fetcher: &'a F,
    commodity: String,
    range: DateRange,
    interval: Interval,
    plan: QueryPlan,
    retry: RetryPolicy,
    cancel: CancelToken,
    next_page: u32,
    records: usize,
    finished: bool,
    progress: Option<ProgressCallback<'a>>,
}

impl<F: ?Sized> std::fmt::Debug for Paginator<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("commodity", &self.commodity)
            .field("range", &self.range)
            .field("plan", &self.plan)
            .field("next_page", &self.next_page)
            .field("records", &self.records)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<'a, F: PageFetcher + ?Sized> Paginator<'a, F> {
    /// Creates a paginator for `commodity` over `range` following `plan`.
    #[must_use]
    pub fn new(
        fetcher: &'a F,
        commodity: impl Into<String>,
        range: DateRange,
        interval: Interval,
        plan: QueryPlan,
    ) -> Self {
        Self {
            fetcher,
            commodity: commodity.into(),
            range,
            interval,
            plan,
            retry: RetryPolicy::default(),
            cancel: CancelToken::new(),
            next_page: 1,
            records: 0,
            finished: false,
            progress: None,
        }
    }

    /// Sets the retry policy used for each page.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the cancellation token checked between pages.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Registers a callback invoked after every received page.
    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(PageProgress) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Returns the commodity being paginated.
    #[must_use]
    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    /// Returns the plan being followed.
    #[must_use]
    pub const fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    /// Returns the number of pages received so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> u32 {
        self.next_page - 1
    }

    /// Returns the number of records received so far.
    #[must_use]
    pub const fn records_fetched(&self) -> usize {
        self.records
    }

    /// Returns true once the last page has been received or the query failed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetches the next page, or returns `Ok(None)` when pagination is complete.
    ///
    /// # Errors
    ///
    /// Returns [`OilPriceError::Cancelled`] if the token fired before the page
    /// was requested or during a retry backoff, and
    /// [`OilPriceError::FatalFetch`] if the page failed permanently. After an
    /// error the paginator is finished.
    pub async fn next_page(&mut self) -> Result<Option<Vec<PricePoint>>> {
        if self.finished {
            return Ok(None);
        }

        let page_number = self.next_page;
        if let Some(reason) = self.cancel.reason() {
            self.finished = true;
            debug!(commodity = %self.commodity, page = page_number, %reason, "query stopped");
            return Err(OilPriceError::Cancelled {
                page: page_number,
                reason,
            });
        }

        let page = match self.fetch_with_retry(page_number).await {
            Ok(page) => page,
            Err(err) => {
                self.finished = true;
                return Err(err);
            }
        };

        self.next_page += 1;
        self.records += page.len();
        self.finished = !page.continues(self.plan.page_size);
        debug!(
            commodity = %self.commodity,
            endpoint = %self.plan.endpoint,
            page = page_number,
            records = page.len(),
            has_more = ?page.has_more,
            "received page"
        );

        if let Some(callback) = &self.progress {
            callback(PageProgress {
                pages: self.pages_fetched(),
                records: self.records,
                expected_pages: self.plan.expected_page_count,
            });
        }

        Ok(Some(page.records))
    }

    /// Fetches every remaining page and returns all records in order.
    ///
    /// Nothing is returned unless every page succeeds.
    ///
    /// # Errors
    ///
    /// See [`Paginator::next_page`].
    pub async fn collect(mut self) -> Result<Vec<PricePoint>> {
        let mut all = Vec::with_capacity(records_hint(&self.plan));
        while let Some(records) = self.next_page().await? {
            all.extend(records);
        }
        Ok(all)
    }

    /// Converts the paginator into a stream of pages.
    ///
    /// The stream ends after the last page or after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<PricePoint>>> + 'a
    where
        F: 'a,
    {
        stream::try_unfold(self, |mut paginator| async move {
            Ok(paginator
                .next_page()
                .await?
                .map(|records| (records, paginator)))
        })
    }

    async fn fetch_with_retry(&self, page: u32) -> Result<Page> {
        let request = PageRequest {
            commodity: &self.commodity,
            endpoint: self.plan.endpoint,
            range: self.range,
            page,
            page_size: self.plan.page_size,
            interval: self.interval,
            timeout: self.plan.timeout(),
        };

        let mut attempt = 0;
        loop {
            match self.fetcher.fetch_page(&request).await {
                Ok(fetched) => return Ok(fetched),
                Err(err) if self.retry.should_retry(attempt, &err) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        commodity = %self.commodity,
                        page,
                        attempt = attempt + 1,
                        max_attempts = self.retry.max_attempts,
                        ?delay,
                        error = %err,
                        "transient page failure, retrying"
                    );
                    if let Err(reason) = self.cancel.sleep(delay).await {
                        return Err(OilPriceError::Cancelled { page, reason });
                    }
                    attempt += 1;
                }
                Err(source) => return Err(fatal(page, attempt + 1, source)),
            }
        }
    }
}

fn fatal(page: u32, attempts: u32, source: FetchError) -> OilPriceError {
    warn!(page, attempts, error = %source, "page failed permanently");
    OilPriceError::FatalFetch {
        page,
        attempts,
        source,
    }
}

/// Upper bound on records reserved up front from a plan's estimate.
const MAX_RESERVED_RECORDS: usize = 100_000;

/// Records a plan is expected to return, capped at [`MAX_RESERVED_RECORDS`].
pub(crate) fn records_hint(plan: &QueryPlan) -> usize {
    (plan.expected_page_count as usize)
        .saturating_mul(plan.page_size as usize)
        .min(MAX_RESERVED_RECORDS)
}

//! High-level historical price client.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use futures::Stream;
use oilprice_telemetry::{Telemetry, TelemetryEvent};
use oilprice_types::{DateRange, Endpoint, Interval, OilPriceError, PricePoint, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    CancelToken, PageFetcher, PageProgress, Paginator, PlanOptions, QueryPlan, QueryPlanner,
    RetryPolicy,
    driver::records_hint,
    fanout::{self, BatchResult, HistoricalQuery},
};

const OP_GET: &str = "historical.get";
const OP_GET_MANY: &str = "historical.get_many";

/// Trims and upper-cases a commodity code.
///
/// # Errors
///
/// Returns [`OilPriceError::InvalidCommodity`] if the code is blank.
pub fn normalize_commodity(code: &str) -> Result<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(OilPriceError::InvalidCommodity(
            "commodity code must not be empty".to_string(),
        ));
    }
    Ok(code.to_ascii_uppercase())
}

/// Per-call options for [`HistoricalClient`].
#[derive(Debug, Clone, Default)]
pub struct HistoricalOptions {
    /// Planning overrides.
    pub plan: PlanOptions,
    /// Overall time budget for the call.
    pub deadline: Option<Duration>,
    /// Caller-held cancellation token.
    pub cancel: Option<CancelToken>,
}

impl HistoricalOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.plan = self.plan.with_page_size(page_size);
        self
    }

    /// Overrides the per-request timeout in seconds.
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.plan = self.plan.with_timeout_secs(secs);
        self
    }

    /// Sets the sample interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Interval) -> Self {
        self.plan = self.plan.with_interval(interval);
        self
    }

    /// Limits the whole call, retries and backoff included, to `deadline`.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Builds the token governing one call. The deadline starts now.
    pub(crate) fn cancel_token(&self) -> CancelToken {
        let token = self.cancel.clone().unwrap_or_default();
        match self.deadline {
            Some(deadline) => token.limited_to(deadline),
            None => token,
        }
    }

    /// Fixes the deadline from now so several queries share one budget.
    pub(crate) fn anchored(&self) -> Self {
        Self {
            plan: self.plan,
            deadline: None,
            cancel: Some(self.cancel_token()),
        }
    }
}

/// Result of a successful historical query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalData {
    /// Normalized commodity code.
    pub commodity: String,
    /// Requested range.
    pub range: DateRange,
    /// Plan that was executed.
    pub plan: QueryPlan,
    /// Every record, in backend order.
    pub prices: Vec<PricePoint>,
}

impl HistoricalData {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns true if the backend had no data for the range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Counters gathered while running one query, successful or not.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct QueryStats {
    pub(crate) endpoint: Option<Endpoint>,
    pub(crate) pages: u32,
    pub(crate) records: usize,
}

type Progress<'a> = Box<dyn Fn(PageProgress) + Send + Sync + 'a>;

/// Validates, plans and paginates one query.
pub(crate) async fn run_query<F: PageFetcher + ?Sized>(
    fetcher: &F,
    planner: &QueryPlanner,
    retry: RetryPolicy,
    query: &HistoricalQuery,
    options: &HistoricalOptions,
    progress: Option<Progress<'_>>,
) -> (Result<HistoricalData>, QueryStats) {
    let mut stats = QueryStats::default();

    let prepared = normalize_commodity(&query.commodity).and_then(|commodity| {
        let range = DateRange::new(query.start, query.end)?;
        let plan = planner.plan(&range, &options.plan)?;
        Ok((commodity, range, plan))
    });
    let (commodity, range, plan) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return (Err(err), stats),
    };
    stats.endpoint = Some(plan.endpoint);
    debug!(%commodity, %range, %plan, "planned query");

    let mut paginator = Paginator::new(fetcher, commodity.as_str(), range, options.plan.interval, plan)
        .with_retry(retry)
        .with_cancel(options.cancel_token());
    if let Some(progress) = progress {
        paginator = paginator.on_progress(progress);
    }

    let mut prices = Vec::with_capacity(records_hint(&plan));
    let outcome = loop {
        match paginator.next_page().await {
            Ok(Some(records)) => prices.extend(records),
            Ok(None) => break Ok(()),
            Err(err) => break Err(err),
        }
    };
    stats.pages = paginator.pages_fetched();
    stats.records = paginator.records_fetched();

    let result = outcome.map(|()| HistoricalData {
        commodity,
        range,
        plan,
        prices,
    });
    (result, stats)
}

/// Historical price client over any [`PageFetcher`].
///
/// Each call is validated and planned locally before the first page is
/// requested, then paginated in order with per-page retry.
#[derive(Debug, Clone)]
pub struct HistoricalClient<F> {
    fetcher: F,
    planner: QueryPlanner,
    retry: RetryPolicy,
    telemetry: Telemetry,
}

impl<F: PageFetcher> HistoricalClient<F> {
    /// Creates a client with default planner, retry policy and no telemetry.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            planner: QueryPlanner::default(),
            retry: RetryPolicy::default(),
            telemetry: Telemetry::disabled(),
        }
    }

    /// Replaces the planner.
    #[must_use]
    pub const fn with_planner(mut self, planner: QueryPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enables telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Returns the underlying fetcher.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the planner.
    #[must_use]
    pub const fn planner(&self) -> &QueryPlanner {
        &self.planner
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Plans a query without fetching anything.
    ///
    /// # Errors
    ///
    /// See [`QueryPlanner::plan`].
    pub fn plan(&self, range: &DateRange, options: &HistoricalOptions) -> Result<QueryPlan> {
        self.planner.plan(range, &options.plan)
    }

    /// Fetches every record for `commodity` between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any request is made. A page
    /// that fails permanently yields [`OilPriceError::FatalFetch`] and
    /// cancellation yields [`OilPriceError::Cancelled`]; in both cases no
    /// partial data is returned.
    pub async fn get_historical(
        &self,
        commodity: &str,
        start: NaiveDate,
        end: NaiveDate,
        options: &HistoricalOptions,
    ) -> Result<HistoricalData> {
        self.get_historical_inner(commodity, start, end, options, None)
            .await
    }

    /// Like [`get_historical`](Self::get_historical), reporting progress after each page.
    ///
    /// # Errors
    ///
    /// See [`get_historical`](Self::get_historical).
    pub async fn get_historical_with_progress(
        &self,
        commodity: &str,
        start: NaiveDate,
        end: NaiveDate,
        options: &HistoricalOptions,
        progress: impl Fn(PageProgress) + Send + Sync,
    ) -> Result<HistoricalData> {
        self.get_historical_inner(commodity, start, end, options, Some(Box::new(progress)))
            .await
    }

    async fn get_historical_inner(
        &self,
        commodity: &str,
        start: NaiveDate,
        end: NaiveDate,
        options: &HistoricalOptions,
        progress: Option<Progress<'_>>,
    ) -> Result<HistoricalData> {
        let started = Instant::now();
        let query = HistoricalQuery::new(commodity, start, end);
        let (result, stats) =
            run_query(&self.fetcher, &self.planner, self.retry, &query, options, progress).await;

        if let Ok(data) = &result {
            info!(
                commodity = %data.commodity,
                endpoint = %data.plan.endpoint,
                pages = stats.pages,
                records = stats.records,
                elapsed = ?started.elapsed(),
                "historical query complete"
            );
        }
        self.emit(OP_GET, started.elapsed(), result.as_ref().err(), stats);
        result
    }

    /// Streams pages for `commodity` between `start` and `end`.
    ///
    /// Validation happens before the stream is returned; the stream yields
    /// one item per page and ends after the last page or the first error.
    ///
    /// # Errors
    ///
    /// Returns validation errors from normalization and planning.
    pub fn iter_pages(
        &self,
        commodity: &str,
        start: NaiveDate,
        end: NaiveDate,
        options: &HistoricalOptions,
    ) -> Result<impl Stream<Item = Result<Vec<PricePoint>>> + Send + '_> {
        let commodity = normalize_commodity(commodity)?;
        let range = DateRange::new(start, end)?;
        let plan = self.planner.plan(&range, &options.plan)?;

        Ok(
            Paginator::new(&self.fetcher, commodity, range, options.plan.interval, plan)
                .with_retry(self.retry)
                .with_cancel(options.cancel_token())
                .into_stream(),
        )
    }

    /// Runs several independent queries with at most `concurrency` in flight.
    ///
    /// Results come back in input order, one per query; a failed query does
    /// not affect the others.
    ///
    /// # Errors
    ///
    /// Returns [`OilPriceError::DuplicateQuery`] before fetching anything if
    /// two queries name the same commodity.
    pub async fn get_many(
        &self,
        queries: Vec<HistoricalQuery>,
        options: &HistoricalOptions,
        concurrency: usize,
    ) -> Result<Vec<BatchResult>> {
        let started = Instant::now();
        let outcome = fanout::fetch_many(
            &self.fetcher,
            &self.planner,
            self.retry,
            queries,
            options,
            concurrency,
        )
        .await;

        match &outcome {
            Ok(results) => {
                let stats = results.iter().fold(QueryStats::default(), |acc, r| QueryStats {
                    endpoint: None,
                    pages: acc.pages + r.pages,
                    records: acc.records + r.records,
                });
                let first_error = results.iter().find_map(|r| r.result.as_ref().err());
                self.emit(OP_GET_MANY, started.elapsed(), first_error, stats);
            }
            Err(err) => {
                self.emit(OP_GET_MANY, started.elapsed(), Some(err), QueryStats::default());
            }
        }
        outcome
    }

    fn emit(
        &self,
        operation: &'static str,
        elapsed: Duration,
        error: Option<&OilPriceError>,
        stats: QueryStats,
    ) {
        if !self.telemetry.is_enabled() {
            return;
        }
        let event = match error {
            None => TelemetryEvent::success(operation, elapsed),
            Some(err) => TelemetryEvent::failure(operation, elapsed, err.error_type()),
        };
        let event = match stats.endpoint {
            Some(endpoint) => event.with_endpoint(endpoint),
            None => event,
        };
        self.telemetry
            .record(&event.with_counts(stats.pages, stats.records));
    }
}

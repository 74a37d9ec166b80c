//! In-memory backend for driver and client tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use oilprice_types::{DateRange, Endpoint, FetchError, Interval, PricePoint};

use crate::{Page, PageFetcher, PageRequest, RetryPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRequest {
    pub(crate) commodity: String,
    pub(crate) endpoint: Endpoint,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) interval: Interval,
    pub(crate) timeout: Duration,
}

/// Serves `total` records split into pages of the requested size.
#[derive(Debug)]
pub(crate) struct SimulatedBackend {
    total: usize,
    signal: bool,
    requests: Mutex<Vec<RecordedRequest>>,
    failures: Mutex<HashMap<u32, VecDeque<FetchError>>>,
    missing: HashSet<String>,
}

impl SimulatedBackend {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            signal: true,
            requests: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            missing: HashSet::new(),
        }
    }

    /// Stops sending `has_more`, leaving the driver to infer the end.
    pub(crate) fn unsignalled(mut self) -> Self {
        self.signal = false;
        self
    }

    /// Fails `page` with each of `errors` in turn before serving it.
    pub(crate) fn fail_page(self, page: u32, errors: Vec<FetchError>) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(page, errors.into_iter().collect());
        self
    }

    /// Answers every request for `commodity` with a not-found error.
    pub(crate) fn missing(mut self, commodity: &str) -> Self {
        self.missing.insert(commodity.to_string());
        self
    }

    pub(crate) fn requests(&self) -> Vec<u32> {
        self.requests.lock().unwrap().iter().map(|r| r.page).collect()
    }

    pub(crate) fn requests_for(&self, commodity: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.commodity == commodity)
            .count()
    }

    pub(crate) fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PageFetcher for SimulatedBackend {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            commodity: request.commodity.to_string(),
            endpoint: request.endpoint,
            page: request.page,
            page_size: request.page_size,
            interval: request.interval,
            timeout: request.timeout,
        });

        if self.missing.contains(request.commodity) {
            return Err(FetchError::NotFound(request.commodity.to_string()));
        }

        let failure = self
            .failures
            .lock()
            .unwrap()
            .get_mut(&request.page)
            .and_then(VecDeque::pop_front);
        if let Some(err) = failure {
            return Err(err);
        }

        let size = request.page_size as usize;
        let start = ((request.page - 1) as usize * size).min(self.total);
        let end = (start + size).min(self.total);
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let records = (start..end)
            .map(|i| {
                PricePoint::new(
                    base + chrono::Duration::minutes(i as i64),
                    request.commodity,
                    i as f64,
                )
            })
            .collect();

        Ok(if self.signal {
            Page::new(records, end < self.total)
        } else {
            Page::unsignalled(records)
        })
    }
}

pub(crate) fn week_range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
    )
    .unwrap()
}

/// Retry policy without backoff delays.
pub(crate) fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::with_max_attempts(max_attempts).with_delays(Duration::ZERO, Duration::ZERO)
}

//! Benchmark utilities for oilprice.
//!
//! Provides an in-memory page backend so planning and pagination can be
//! measured without a network.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use oilprice_lib::{
    DateRange, FetchError, HistoricalClient, HistoricalOptions, Page, PageFetcher, PageRequest,
    PricePoint,
};
use std::time::{Duration, Instant};

/// Backend that serves `total` synthetic records in pages.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    total: usize,
    base: DateTime<Utc>,
}

impl InMemoryBackend {
    /// Creates a backend holding `total` records.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            base: DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
        }
    }

    /// Returns the number of records held.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }
}

#[async_trait]
impl PageFetcher for InMemoryBackend {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        let size = request.page_size as usize;
        let from = (request.page as usize - 1) * size;
        let to = (from + size).min(self.total);
        let records = (from..to)
            .map(|i| {
                PricePoint::new(
                    self.base + ChronoDuration::minutes(i as i64),
                    request.commodity,
                    70.0 + (i % 100) as f64 / 10.0,
                )
            })
            .collect();
        Ok(Page::new(records, to < self.total))
    }
}

/// Configuration for a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Commodity code requested.
    pub commodity: String,
    /// Start of the requested range.
    pub start: NaiveDate,
    /// End of the requested range.
    pub end: NaiveDate,
    /// Records served by the backend.
    pub records: usize,
    /// Page size requested.
    pub page_size: u32,
}

impl BenchmarkConfig {
    /// Creates a config over the `days` days ending 2024-12-31.
    #[must_use]
    pub fn last_days(days: u32, records: usize, page_size: u32) -> Self {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default();
        let start = DateRange::last_days(end, days)
            .map(|range| range.start())
            .unwrap_or(end);
        Self {
            commodity: "BRENT_CRUDE_USD".to_string(),
            start,
            end,
            records,
            page_size,
        }
    }
}

/// Result of a single benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Wall time of the query.
    pub duration: Duration,
    /// Pages the plan expected.
    pub expected_pages: u32,
    /// Records returned.
    pub records: usize,
    /// Error message if the query failed.
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Records per second.
    #[must_use]
    pub fn records_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

/// Runs one paginated query against an [`InMemoryBackend`].
pub async fn run_query(config: &BenchmarkConfig) -> BenchmarkResult {
    let client = HistoricalClient::new(InMemoryBackend::new(config.records));
    let options = HistoricalOptions::new().with_page_size(config.page_size);
    let started = Instant::now();

    match client
        .get_historical(&config.commodity, config.start, config.end, &options)
        .await
    {
        Ok(data) => BenchmarkResult {
            duration: started.elapsed(),
            expected_pages: data.plan.expected_page_count,
            records: data.len(),
            error: None,
        },
        Err(err) => BenchmarkResult {
            duration: started.elapsed(),
            expected_pages: 0,
            records: 0,
            error: Some(err.to_string()),
        },
    }
}

/// Format duration for display.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros >= 1_000_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else if micros >= 1_000 {
        format!("{:.2}ms", micros as f64 / 1_000.0)
    } else {
        format!("{micros}µs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(250)), "250µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(2_500)), "2.50s");
    }

    #[test]
    fn test_last_days_config() {
        let config = BenchmarkConfig::last_days(7, 10, 5);
        assert_eq!(config.start, NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());
    }

    #[tokio::test]
    async fn test_run_query_collects_everything() {
        let result = run_query(&BenchmarkConfig::last_days(30, 2_500, 1_000)).await;
        assert!(result.error.is_none());
        assert_eq!(result.records, 2_500);
    }
}

//! Bounded-concurrency fan-out across independent commodity queries.

use std::collections::HashSet;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use oilprice_types::{OilPriceError, Result};
use tracing::debug;

use crate::historical::{HistoricalData, HistoricalOptions, normalize_commodity, run_query};
use crate::{PageFetcher, QueryPlanner, RetryPolicy};

/// One commodity query in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalQuery {
    /// Commodity code, normalized before use.
    pub commodity: String,
    /// First date, inclusive.
    pub start: NaiveDate,
    /// Last date, inclusive.
    pub end: NaiveDate,
}

impl HistoricalQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(commodity: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            commodity: commodity.into(),
            start,
            end,
        }
    }
}

/// Outcome of one query in a batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Commodity code as given in the query.
    pub commodity: String,
    /// Data or the error that stopped this query.
    pub result: Result<HistoricalData>,
    /// Pages fetched before success or failure.
    pub pages: u32,
    /// Records fetched before success or failure.
    pub records: usize,
}

/// Rejects batches naming the same commodity twice.
fn check_duplicates(queries: &[HistoricalQuery]) -> Result<()> {
    let mut seen = HashSet::with_capacity(queries.len());
    for query in queries {
        // Blank codes fail individually later.
        let Ok(code) = normalize_commodity(&query.commodity) else {
            continue;
        };
        if !seen.insert(code.clone()) {
            return Err(OilPriceError::DuplicateQuery(code));
        }
    }
    Ok(())
}

/// Runs `queries` with at most `concurrency` in flight.
///
/// Each query paginates in order on its own. Results are returned in input
/// order. A concurrency of 0 is treated as 1. A deadline in `options`
/// covers the whole batch.
///
/// # Errors
///
/// Returns [`OilPriceError::DuplicateQuery`] before any request if two
/// queries name the same commodity.
pub async fn fetch_many<F: PageFetcher + ?Sized>(
    fetcher: &F,
    planner: &QueryPlanner,
    retry: RetryPolicy,
    queries: Vec<HistoricalQuery>,
    options: &HistoricalOptions,
    concurrency: usize,
) -> Result<Vec<BatchResult>> {
    check_duplicates(&queries)?;
    let concurrency = concurrency.max(1);
    debug!(queries = queries.len(), concurrency, "starting batch");

    // One deadline for the whole batch, not one per query.
    let options = &options.anchored();
    let results = stream::iter(queries)
        .map(|query| async move {
            let (result, stats) = run_query(fetcher, planner, retry, &query, options, None).await;
            BatchResult {
                commodity: query.commodity,
                result,
                pages: stats.pages,
                records: stats.records,
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    Ok(results)
}

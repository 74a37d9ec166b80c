//! Plan command implementation.
//!
//! Prints the endpoint, timeout and paging the SDK would use for a range.

use crate::display::{parse_date, print_plan_header, print_plan_row};
use anyhow::Result;
use oilprice_lib::prelude::*;
use oilprice_lib::{Interval, PlanOptions};

/// Plans a query over `start..=end` and prints the result.
pub(crate) fn show_plan(
    start: &str,
    end: &str,
    page_size: Option<u32>,
    timeout: Option<u64>,
    interval: Interval,
) -> Result<()> {
    let range = DateRange::new(parse_date(start, "start")?, parse_date(end, "end")?)?;

    let mut options = PlanOptions::new().with_interval(interval);
    if let Some(size) = page_size {
        options = options.with_page_size(size);
    }
    if let Some(secs) = timeout {
        options = options.with_timeout_secs(secs);
    }

    let plan = QueryPlanner::default().plan(&range, &options)?;

    println!("Range:          {range}");
    println!("Interval:       {interval}");
    println!("Endpoint:       {} ({})", plan.endpoint, plan.endpoint.path());
    println!("Timeout:        {}s", plan.timeout_secs);
    println!("Page size:      {}", plan.page_size);
    println!("Expected pages: {}", plan.expected_page_count);
    println!();
    print_plan_header();
    print_plan_row("requested", &range, &plan);

    Ok(())
}

//! Info command implementation.
//!
//! Shows a commodity's metadata and the plan the SDK picks for common
//! lookback windows ending today.

use crate::display::{print_plan_header, print_plan_row};
use anyhow::{Context, Result};
use oilprice_lib::PlanOptions;
use oilprice_lib::prelude::*;

const WINDOWS: [(&str, u32); 4] = [
    ("Last 1 day", 1),
    ("Last 1 week", 7),
    ("Last 1 month", 30),
    ("Last 1 year", 365),
];

/// Show detailed information about a commodity.
pub(crate) fn show_info(code: &str) -> Result<()> {
    let registry = CommodityRegistry::global();
    let commodity = registry
        .get(code)
        .with_context(|| format!("Unknown commodity: {code}. Run `oilprice list` to see known codes"))?;

    println!("Commodity: {}", commodity.name());
    println!("Code:      {}", commodity.code());
    println!("Category:  {}", commodity.category());
    println!("Unit:      {}", commodity.unit());
    println!("Currency:  {}", commodity.currency());

    let today = chrono::Utc::now().date_naive();
    let planner = QueryPlanner::default();
    let options = PlanOptions::new();

    println!("\nQuery plans (daily interval, default page size):");
    print_plan_header();
    for (label, days) in WINDOWS {
        let range = DateRange::last_days(today, days)?;
        let plan = planner.plan(&range, &options)?;
        print_plan_row(label, &range, &plan);
    }

    Ok(())
}

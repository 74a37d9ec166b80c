//! List command implementation.
//!
//! This module handles listing known commodity codes with optional filtering.

use crate::display::CategoryArg;
use anyhow::Result;
use oilprice_lib::prelude::*;

/// List known commodities with optional category filter or search pattern.
pub(crate) fn list_commodities(category: Option<CategoryArg>, search: Option<&str>) -> Result<()> {
    let registry = CommodityRegistry::global();

    let commodities: Vec<_> = match (category, search) {
        (Some(category), _) => registry.by_category(category.into()).collect(),
        (_, Some(pattern)) => registry.search(pattern),
        (None, None) => registry.all().collect(),
    };

    if commodities.is_empty() {
        println!("No commodities found.");
        return Ok(());
    }

    println!("{:<20} {:<30} {:<12} {:<10}", "CODE", "NAME", "CATEGORY", "UNIT");
    println!("{}", "-".repeat(74));

    for commodity in &commodities {
        println!(
            "{:<20} {:<30} {:<12} {:<10}",
            commodity.code(),
            commodity.name(),
            commodity.category().as_str(),
            commodity.unit()
        );
    }

    println!("\nTotal: {} commodities", commodities.len());
    Ok(())
}

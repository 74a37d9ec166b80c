//! Display utilities and argument types for the oilprice CLI.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use oilprice_lib::prelude::*;
use tracing_subscriber::EnvFilter;

/// Output format for downloaded data.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Tsv => Self::Tsv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Commodity category filter.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum CategoryArg {
    Crude,
    NaturalGas,
    Refined,
    Coal,
    Marine,
    Index,
}

impl From<CategoryArg> for Category {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Crude => Self::Crude,
            CategoryArg::NaturalGas => Self::NaturalGas,
            CategoryArg::Refined => Self::Refined,
            CategoryArg::Coal => Self::Coal,
            CategoryArg::Marine => Self::Marine,
            CategoryArg::Index => Self::Index,
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over the flags.
pub(crate) fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses a `YYYY-MM-DD` date.
pub(crate) fn parse_date(s: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {what} date: {s} (expected YYYY-MM-DD)"))
}

/// Prints one row of the plan table.
pub(crate) fn print_plan_row(label: &str, range: &DateRange, plan: &QueryPlan) {
    println!(
        "{:<14} {:>5} {:<12} {:>8} {:>6} {:>8}",
        label,
        range.span_days(),
        plan.endpoint.as_str(),
        format!("{}s", plan.timeout_secs),
        plan.page_size,
        plan.expected_page_count
    );
}

/// Prints the plan table header.
pub(crate) fn print_plan_header() {
    println!(
        "{:<14} {:>5} {:<12} {:>8} {:>6} {:>8}",
        "RANGE", "SPAN", "ENDPOINT", "TIMEOUT", "PAGE", "PAGES"
    );
    println!("{}", "-".repeat(58));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-06-01 ", "start").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        let err = parse_date("06/01/2024", "end").unwrap_err();
        assert!(err.to_string().contains("Invalid end date"));
    }

    #[test]
    fn test_format_maps_to_extension() {
        assert_eq!(OutputFormat::from(Format::Ndjson).extension(), "ndjson");
        assert_eq!(OutputFormat::from(Format::Tsv).extension(), "tsv");
    }

    #[test]
    fn test_category_arg_names() {
        let value = CategoryArg::NaturalGas.to_possible_value().unwrap();
        assert_eq!(value.get_name(), "natural-gas");
        assert_eq!(Category::from(CategoryArg::NaturalGas), Category::NaturalGas);
    }
}

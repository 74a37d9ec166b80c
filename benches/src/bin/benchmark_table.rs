//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package oilprice-bench --bin benchmark_table --release`

use oilprice_bench::{BenchmarkConfig, BenchmarkResult, format_duration, run_query};

/// Number of iterations per benchmark for statistical significance.
const ITERATIONS: u32 = 5;

#[tokio::main]
async fn main() {
    println!("oilprice pagination benchmark (in-memory backend)");
    println!("==================================================\n");

    let configs = [
        ("1 day", BenchmarkConfig::last_days(1, 1_440, 100)),
        ("1 week", BenchmarkConfig::last_days(7, 10_080, 500)),
        ("1 month", BenchmarkConfig::last_days(30, 43_200, 1000)),
        ("1 year", BenchmarkConfig::last_days(365, 100_000, 1000)),
    ];

    println!("| Range | Records | Page size | Planned pages | Pages | Median | Records/s |");
    println!("|-------|---------|-----------|---------------|-------|--------|-----------|");

    for (name, config) in &configs {
        let mut runs: Vec<BenchmarkResult> = Vec::new();
        for _ in 0..ITERATIONS {
            runs.push(run_query(config).await);
        }

        if let Some(failed) = runs.iter().find_map(|r| r.error.as_deref()) {
            println!(
                "| {name} | - | {} | - | - | failed: {failed} | - |",
                config.page_size
            );
            continue;
        }

        runs.sort_by_key(|r| r.duration);
        let median = &runs[runs.len() / 2];
        let pages = median.records.div_ceil(config.page_size as usize);
        println!(
            "| {name} | {} | {} | {} | {pages} | {} | {:.0} |",
            median.records,
            config.page_size,
            median.expected_pages,
            format_duration(median.duration),
            median.records_per_sec()
        );
    }
}

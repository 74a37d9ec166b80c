//! Planning and pagination benchmarks over an in-memory backend.
//!
//! Run with: `cargo bench --package oilprice-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oilprice_bench::{BenchmarkConfig, InMemoryBackend, run_query};
use oilprice_lib::{
    DateRange, HistoricalClient, HistoricalOptions, OutputFormat, PlanOptions, QueryPlanner,
};
use std::hint::black_box;
use tempfile::TempDir;

fn planning_benchmark(c: &mut Criterion) {
    let planner = QueryPlanner::default();
    let options = PlanOptions::new();
    let end = chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let mut group = c.benchmark_group("plan");
    for days in [1u32, 7, 30, 365, 3650] {
        let range = DateRange::last_days(end, days).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(days), &range, |b, range| {
            b.iter(|| planner.plan(black_box(range), &options).unwrap());
        });
    }
    group.finish();
}

fn pagination_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("paginate");
    group.sample_size(20);

    for page_size in [100u32, 500, 1000] {
        let config = BenchmarkConfig::last_days(365, 10_000, page_size);
        group.throughput(Throughput::Elements(config.records as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(page_size),
            &config,
            |b, config| {
                b.to_async(&runtime).iter(|| async {
                    let result = run_query(config).await;
                    assert_eq!(result.records, config.records);
                });
            },
        );
    }
    group.finish();
}

fn write_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let config = BenchmarkConfig::last_days(30, 5_000, 1000);
    let client = HistoricalClient::new(InMemoryBackend::new(config.records));
    let data = runtime
        .block_on(client.get_historical(
            &config.commodity,
            config.start,
            config.end,
            &HistoricalOptions::new().with_page_size(config.page_size),
        ))
        .unwrap();

    let temp_dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Elements(data.len() as u64));

    for format in OutputFormat::all() {
        let path = temp_dir.path().join(format!("out.{}", format.extension()));
        group.bench_function(format.to_string(), |b| {
            b.iter(|| format.write_file(&data.prices, &path).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    planning_benchmark,
    pagination_benchmark,
    write_benchmark
);
criterion_main!(benches);

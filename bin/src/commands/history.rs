//! History command implementation.
//!
//! Downloads historical prices for one or more commodities and writes one
//! file per commodity.

use crate::display::{Format, parse_date};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use oilprice_lib::prelude::*;
use oilprice_lib::{Interval, PageProgress};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Arguments of the `history` command.
pub(crate) struct HistoryArgs {
    pub(crate) codes: Vec<String>,
    pub(crate) start: String,
    pub(crate) end: Option<String>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) format: Format,
    pub(crate) page_size: Option<u32>,
    pub(crate) timeout: Option<u64>,
    pub(crate) interval: Interval,
    pub(crate) max_retries: u32,
    pub(crate) deadline: Option<u64>,
    pub(crate) parallel: usize,
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) telemetry: bool,
    pub(crate) quiet: bool,
}

impl HistoryArgs {
    fn options(&self, cancel: CancelToken) -> HistoricalOptions {
        let mut options = HistoricalOptions::new()
            .with_interval(self.interval)
            .with_cancel(cancel);
        if let Some(size) = self.page_size {
            options = options.with_page_size(size);
        }
        if let Some(secs) = self.timeout {
            options = options.with_timeout_secs(secs);
        }
        if let Some(secs) = self.deadline {
            options = options.with_deadline(Duration::from_secs(secs));
        }
        options
    }

    fn client(&self) -> Result<OilPriceClient> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .context("API key required. Set OILPRICEAPI_KEY or pass --api-key")?;

        let mut config = ClientConfig::new(api_key);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }

        let retry = RetryPolicy::with_max_attempts(self.max_retries.saturating_add(1));
        let mut client = HistoricalClient::new(HttpTransport::new(config)?).with_retry(retry);
        if self.telemetry {
            client = client.with_telemetry(Telemetry::tracing());
        }
        Ok(client)
    }
}

/// Download historical prices.
pub(crate) async fn history(args: HistoryArgs) -> Result<()> {
    let start = parse_date(&args.start, "start")?;
    let end = match &args.end {
        Some(s) => parse_date(s, "end")?,
        None => chrono::Utc::now().date_naive(),
    };

    let registry = CommodityRegistry::global();
    for code in &args.codes {
        if !registry.contains(code) {
            tracing::warn!(%code, "commodity not in the local list, the API may still know it");
        }
    }

    let client = args.client()?;
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    let options = args.options(cancel);
    let format = OutputFormat::from(args.format);

    if let [code] = args.codes.as_slice() {
        let path = output_path(code, args.output.as_deref(), format, false);
        fetch_one(&client, code, start, end, &options, args.quiet, format, &path).await
    } else {
        if let Some(dir) = &args.output {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }
        fetch_several(&client, &args, start, end, &options, format).await
    }
}

#[allow(clippy::too_many_arguments)]
async fn fetch_one(
    client: &OilPriceClient,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
    options: &HistoricalOptions,
    quiet: bool,
    format: OutputFormat,
    path: &Path,
) -> Result<()> {
    let range = DateRange::new(start, end)?;
    let plan = client.plan(&range, options)?;
    tracing::info!(%code, %range, %plan, "starting download");

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(u64::from(plan.expected_page_count));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")?
                .progress_chars("=>-"),
        );
        pb.set_message(format!("{code} via {}", plan.endpoint));
        pb
    };

    let bar = progress.clone();
    let result = client
        .get_historical_with_progress(code, start, end, options, move |p: PageProgress| {
            let pages = u64::from(p.pages);
            if bar.length().is_some_and(|len| pages > len) {
                bar.set_length(pages);
            }
            bar.set_position(pages);
            bar.set_message(format!("{} records", p.records));
        })
        .await;

    let data = match result {
        Ok(data) => data,
        Err(err) => {
            progress.abandon_with_message("failed");
            return Err(err).with_context(|| format!("Failed to fetch {code}"));
        }
    };
    progress.finish_with_message(format!("Downloaded {} records", data.len()));

    format
        .write_file(&data.prices, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    if !quiet {
        println!("Output written to: {}", path.display());
    }
    Ok(())
}

async fn fetch_several(
    client: &OilPriceClient,
    args: &HistoryArgs,
    start: NaiveDate,
    end: NaiveDate,
    options: &HistoricalOptions,
    format: OutputFormat,
) -> Result<()> {
    let spinner = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(format!(
            "Fetching {} commodities ({} at a time)",
            args.codes.len(),
            args.parallel.max(1)
        ));
        pb
    };

    let queries = args
        .codes
        .iter()
        .map(|code| HistoricalQuery::new(code.as_str(), start, end))
        .collect();
    let results = client.get_many(queries, options, args.parallel).await;
    spinner.finish_and_clear();

    let mut failed = 0usize;
    for batch in results? {
        match batch.result {
            Ok(data) => {
                let path = output_path(&data.commodity, args.output.as_deref(), format, true);
                format
                    .write_file(&data.prices, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !args.quiet {
                    println!(
                        "{:<20} {:>8} records  {}",
                        data.commodity,
                        data.len(),
                        path.display()
                    );
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("{:<20} failed: {err}", batch.commodity);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} commodities failed", args.codes.len());
    }
    Ok(())
}

/// Picks the output file for `code`.
///
/// With several codes `output` names a directory; with one it names the file.
fn output_path(code: &str, output: Option<&Path>, format: OutputFormat, several: bool) -> PathBuf {
    let file_name = format!("{}.{}", code.trim().to_lowercase(), format.extension());
    match output {
        Some(dir) if several => dir.join(file_name),
        Some(file) => file.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

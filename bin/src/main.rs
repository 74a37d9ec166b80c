//! oilprice CLI - historical commodity price planner and downloader.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use oilprice_lib::Interval;
use std::path::PathBuf;

mod commands;
mod display;

use display::{CategoryArg, Format};

#[derive(Parser)]
#[command(name = "oilprice")]
#[command(about = "Plan and download historical commodity prices from OilPriceAPI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the query plan for a date range without fetching anything
    Plan {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,

        /// Records per page (1-1000)
        #[arg(long)]
        page_size: Option<u32>,

        /// Request timeout in seconds (overrides the endpoint default)
        #[arg(long)]
        timeout: Option<u64>,

        /// Sample interval (minute, hourly, daily, weekly, monthly)
        #[arg(short, long, default_value = "daily")]
        interval: Interval,
    },

    /// Download historical prices for one or more commodities
    History {
        /// Commodity codes (e.g., BRENT_CRUDE_USD WTI_USD)
        #[arg(required = true)]
        codes: Vec<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        end: Option<String>,

        /// Output file, or directory when several codes are given.
        /// Defaults to <code>.<format> in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Records per page (1-1000)
        #[arg(long)]
        page_size: Option<u32>,

        /// Request timeout in seconds (overrides the endpoint default)
        #[arg(long)]
        timeout: Option<u64>,

        /// Sample interval (minute, hourly, daily, weekly, monthly)
        #[arg(short, long, default_value = "daily")]
        interval: Interval,

        /// Retries per page after the first attempt
        #[arg(long, default_value = "2")]
        max_retries: u32,

        /// Give up after this many seconds, retries included
        #[arg(long)]
        deadline: Option<u64>,

        /// Maximum commodities fetched concurrently
        #[arg(long, default_value = "4")]
        parallel: usize,

        /// API key
        #[arg(long, env = "OILPRICEAPI_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// API base URL
        #[arg(long, env = "OILPRICEAPI_BASE_URL")]
        base_url: Option<String>,

        /// Log a telemetry event per call
        #[arg(long)]
        telemetry: bool,
    },

    /// List known commodity codes
    List {
        /// Filter by category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,

        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show commodity details and the plans used for common ranges
    Info {
        /// Commodity code
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    display::init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Plan {
            start,
            end,
            page_size,
            timeout,
            interval,
        } => commands::plan::show_plan(&start, &end, page_size, timeout, interval),
        Commands::History {
            codes,
            start,
            end,
            output,
            format,
            page_size,
            timeout,
            interval,
            max_retries,
            deadline,
            parallel,
            api_key,
            base_url,
            telemetry,
        } => {
            commands::history::history(commands::history::HistoryArgs {
                codes,
                start,
                end,
                output,
                format,
                page_size,
                timeout,
                interval,
                max_retries,
                deadline,
                parallel,
                api_key,
                base_url,
                telemetry,
                quiet: cli.quiet,
            })
            .await
        }
        Commands::List { category, search } => {
            commands::list::list_commodities(category, search.as_deref())
        }
        Commands::Info { code } => commands::info::show_info(&code),
    }
}

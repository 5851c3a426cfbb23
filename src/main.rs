mod analyzer;
mod cli;
mod config;
mod fetcher;
mod model;
mod normalizer;
mod parser;
mod reporter;
mod scheduler;

use analyzer::VolatilityAnalyzer;
use clap::Parser;
use cli::Cli;
use fetcher::YahooFetcher;
use reporter::{Reporter, TableReporter};
use scheduler::Scheduler;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();

    let tickers = cli.ticker_list();
    if tickers.is_empty() {
        eprintln!("{}", Cli::usage());
        return ExitCode::FAILURE;
    }

    let config = match cli.resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fetcher = match YahooFetcher::new(&config) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to initialize fetcher: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let analyzer = VolatilityAnalyzer::with_ratio(config.red_threshold_ratio);

    let mut scheduler = Scheduler::new(Arc::new(fetcher), Arc::new(analyzer));
    if let Some(limit) = config.max_concurrency {
        scheduler = scheduler.with_max_concurrency(limit);
    }
    if let Some(secs) = config.fetch_timeout_secs {
        scheduler = scheduler.with_fetch_timeout(Duration::from_secs(secs));
    }

    info!("Analyzing {} tickers: {}", tickers.len(), tickers.join(", "));
    let matrix = scheduler.run(&tickers, &config.timeframes).await;

    print!("{}", TableReporter::new().render(&matrix));
    ExitCode::SUCCESS
}

use crate::config::{load_config, AppConfig};
use crate::model::{AppError, Timeframe};
use crate::normalizer::{normalize_tickers, normalize_timeframes};
use clap::{CommandFactory, Parser};

#[derive(Parser, Debug)]
#[command(name = "redday")]
#[command(about = "Average daily move and monthly red days per ticker and timeframe", long_about = None)]
pub struct Cli {
    /// Comma-separated list of ticker symbols (e.g. NVDA,GOOG,MSFT)
    #[arg(short, long)]
    pub tickers: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Comma-separated timeframes to report (ytd, 1y, 3y, 5y, 10y)
    #[arg(long, value_delimiter = ',')]
    pub timeframes: Option<Vec<Timeframe>>,

    /// Maximum number of ticker/timeframe pairs fetched at once
    #[arg(long)]
    pub max_concurrency: Option<usize>,
}

impl Cli {
    /// Normalized tickers, empty when none were given.
    pub fn ticker_list(&self) -> Vec<String> {
        self.tickers.as_deref().map(normalize_tickers).unwrap_or_default()
    }

    /// File config (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<AppConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };
        if let Some(timeframes) = &self.timeframes {
            config.timeframes = normalize_timeframes(timeframes);
        }
        if let Some(limit) = self.max_concurrency {
            config.max_concurrency = Some(limit);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn usage() -> String {
        format!(
            "Please provide at least one ticker using the --tickers flag.\n\n{}",
            Self::command().render_usage()
        )
    }
}

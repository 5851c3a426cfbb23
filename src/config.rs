use crate::model::{AppError, Timeframe};
use crate::normalizer::normalize_timeframes;
use serde::Deserialize;
use std::fs;
use tokio::sync::Semaphore;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Report rows, in order.
    pub timeframes: Vec<Timeframe>,
    pub base_url: String,
    pub user_agent: String,
    /// HTTP client timeout for a single request.
    pub request_timeout_secs: u64,
    /// Upper bound on one pair's fetch step as seen by the scheduler.
    pub fetch_timeout_secs: Option<u64>,
    /// Maximum number of pairs fetching at once. `None` launches everything.
    pub max_concurrency: Option<usize>,
    /// Fraction of the average absolute move a decline must exceed to count as red.
    pub red_threshold_ratio: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeframes: Timeframe::ALL.to_vec(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            fetch_timeout_secs: None,
            max_concurrency: None,
            red_threshold_ratio: 1.0,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeframes.is_empty() {
            return Err(AppError::Config("at least one timeframe is required".into()));
        }
        if !self.red_threshold_ratio.is_finite() || self.red_threshold_ratio <= 0.0 {
            return Err(AppError::Config(format!(
                "red_threshold_ratio must be a positive number, got {}",
                self.red_threshold_ratio
            )));
        }
        if let Some(limit) = self.max_concurrency {
            if limit == 0 || limit > Semaphore::MAX_PERMITS {
                return Err(AppError::Config(format!(
                    "max_concurrency must be between 1 and {}, got {}",
                    Semaphore::MAX_PERMITS,
                    limit
                )));
            }
        }
        if self.request_timeout_secs == 0 || self.fetch_timeout_secs == Some(0) {
            return Err(AppError::Config("timeouts must be at least one second".into()));
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {}", path, e)))?;
    parse_config(&content).map_err(|e| AppError::Config(format!("{}: {}", path, e)))
}

fn parse_config(content: &str) -> Result<AppConfig, AppError> {
    let mut config: AppConfig =
        serde_json::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
    config.timeframes = normalize_timeframes(&config.timeframes);
    config.validate()?;
    Ok(config)
}

use crate::model::{FetchError, Series, Timeframe};

/// Source of daily price history for one ticker over one trailing window.
#[async_trait::async_trait]
pub trait TimeSeriesFetcher: Send + Sync {
    async fn fetch(&self, ticker: &str, timeframe: Timeframe) -> Result<Series, FetchError>;
}

// Scheduler: one fetch-and-analyze task per (ticker, timeframe), joined into a matrix.

pub mod matrix;

pub use matrix::{Cell, ResultMatrix};

use crate::analyzer::Analyzer;
use crate::fetcher::TimeSeriesFetcher;
use crate::model::{AnalysisResult, FetchError, PairError, Timeframe, VolatilityStats};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

pub struct Scheduler {
    fetcher: Arc<dyn TimeSeriesFetcher>,
    analyzer: Arc<dyn Analyzer>,
    limit: Option<Arc<Semaphore>>,
    fetch_timeout: Option<Duration>,
}

impl Scheduler {
    pub fn new(fetcher: Arc<dyn TimeSeriesFetcher>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            fetcher,
            analyzer,
            limit: None,
            fetch_timeout: None,
        }
    }

    /// Caps how many pairs fetch and analyze at the same time.
    pub fn with_max_concurrency(mut self, permits: usize) -> Self {
        self.limit = Some(Arc::new(Semaphore::new(permits.clamp(1, Semaphore::MAX_PERMITS))));
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Runs every pair and waits for all of them before building the matrix.
    /// Rows follow `timeframes`, columns follow `tickers`.
    pub async fn run(&self, tickers: &[String], timeframes: &[Timeframe]) -> ResultMatrix {
        let pairs = tickers.len() * timeframes.len();
        info!(
            "Launching {} tasks ({} tickers x {} timeframes)",
            pairs,
            tickers.len(),
            timeframes.len()
        );

        // Room for every result, so no task waits on the sink.
        let (tx, mut rx) = mpsc::channel::<AnalysisResult>(pairs.max(1));
        let mut handles = Vec::with_capacity(pairs);

        for ticker in tickers {
            for &timeframe in timeframes {
                let tx = tx.clone();
                let fetcher = self.fetcher.clone();
                let analyzer = self.analyzer.clone();
                let limit = self.limit.clone();
                let fetch_timeout = self.fetch_timeout;
                let ticker = ticker.clone();

                handles.push(tokio::spawn(async move {
                    let _permit = match limit {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };

                    let outcome = process_pair(
                        fetcher.as_ref(),
                        analyzer.as_ref(),
                        &ticker,
                        timeframe,
                        fetch_timeout,
                    )
                    .await;

                    match &outcome {
                        Ok(stats) => debug!("{} [{}]: {}", ticker, timeframe, stats),
                        Err(e) => warn!("{} [{}] failed: {}", ticker, timeframe, e),
                    }

                    if tx
                        .send(AnalysisResult {
                            ticker,
                            timeframe,
                            outcome,
                        })
                        .await
                        .is_err()
                    {
                        error!("Result sink closed before all tasks finished");
                    }
                }));
            }
        }
        drop(tx);

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!("Analysis task did not complete: {}", e);
            }
        }

        let mut results = Vec::with_capacity(pairs);
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        info!("Collected {} of {} results", results.len(), pairs);

        let matrix = ResultMatrix::assemble(tickers, timeframes, results);
        let failed = matrix.count(|c| *c == Cell::Error);
        let missing = matrix.count(|c| *c == Cell::Missing);
        if failed + missing > 0 {
            warn!("{} pairs failed, {} pairs missing", failed, missing);
        }
        matrix
    }
}

async fn process_pair(
    fetcher: &dyn TimeSeriesFetcher,
    analyzer: &dyn Analyzer,
    ticker: &str,
    timeframe: Timeframe,
    fetch_timeout: Option<Duration>,
) -> Result<VolatilityStats, PairError> {
    let fetch = fetcher.fetch(ticker, timeframe);
    let series = match fetch_timeout {
        Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
            FetchError::Transport(format!("fetch timed out after {:?}", limit))
        })??,
        None => fetch.await?,
    };

    Ok(analyzer.analyze(&series)?)
}

// Core structs: Series, PricePoint, VolatilityStats, AnalysisResult
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trailing window requested from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

impl Timeframe {
    /// Report rows, in display order.
    pub const ALL: [Timeframe; 5] = [
        Timeframe::YearToDate,
        Timeframe::OneYear,
        Timeframe::ThreeYears,
        Timeframe::FiveYears,
        Timeframe::TenYears,
    ];

    /// Range keyword understood by the chart API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::YearToDate => "ytd",
            Timeframe::OneYear => "1y",
            Timeframe::ThreeYears => "3y",
            Timeframe::FiveYears => "5y",
            Timeframe::TenYears => "10y",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.trim().to_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == keyword)
            .ok_or_else(|| format!("unknown timeframe '{}' (expected ytd, 1y, 3y, 5y or 10y)", s))
    }
}

/// One trading session reduced to what the analyzer needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

/// Daily history for one (ticker, timeframe), kept as the parallel arrays
/// the data source delivers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub timestamps: Vec<i64>,
    pub opens: Vec<f64>,
    pub closes: Vec<f64>,
    /// Exchange offset from UTC, used to place sessions in calendar months.
    pub utc_offset_secs: i32,
}

impl Series {
    pub fn new(timestamps: Vec<i64>, opens: Vec<f64>, closes: Vec<f64>) -> Self {
        Self {
            timestamps,
            opens,
            closes,
            utc_offset_secs: 0,
        }
    }

    pub fn with_utc_offset(mut self, utc_offset_secs: i32) -> Self {
        self.utc_offset_secs = utc_offset_secs;
        self
    }

    /// Zips the arrays into points, failing if their lengths disagree.
    pub fn points(&self) -> Result<Vec<PricePoint>, AnalyzeError> {
        if self.timestamps.len() != self.opens.len() || self.timestamps.len() != self.closes.len() {
            return Err(AnalyzeError::ShapeMismatch {
                timestamps: self.timestamps.len(),
                opens: self.opens.len(),
                closes: self.closes.len(),
            });
        }

        let offset = FixedOffset::east_opt(self.utc_offset_secs).unwrap_or(Utc.fix());

        Ok(self
            .timestamps
            .iter()
            .zip(self.opens.iter().zip(self.closes.iter()))
            .map(|(&ts, (&open, &close))| PricePoint {
                date: local_date(ts, &offset),
                open,
                close,
            })
            .collect())
    }
}

fn local_date(ts: i64, offset: &FixedOffset) -> NaiveDate {
    let utc: DateTime<Utc> = DateTime::from_timestamp(ts, 0).unwrap_or_default();
    offset.from_utc_datetime(&utc.naive_utc()).date_naive()
}

/// Summary produced by the analyzer for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityStats {
    pub avg_abs_move_pct: f64,
    pub avg_monthly_red_days: u32,
}

impl fmt::Display for VolatilityStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Avg Abs: {:.2}% / Red: {} days",
            self.avg_abs_move_pct, self.avg_monthly_red_days
        )
    }
}

/// Outcome of one fetch-and-analyze task.
#[derive(Debug)]
pub struct AnalysisResult {
    pub ticker: String,
    pub timeframe: Timeframe,
    pub outcome: Result<VolatilityStats, PairError>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalyzeError {
    #[error("mismatch in data lengths: {timestamps} timestamps, {opens} opens, {closes} closes")]
    ShapeMismatch {
        timestamps: usize,
        opens: usize,
        closes: usize,
    },
    #[error("no valid trading days found")]
    NoValidData,
}

/// Anything that can sink a single (ticker, timeframe) pair.
#[derive(Debug, Error)]
pub enum PairError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

/// Startup failures that stop the whole run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

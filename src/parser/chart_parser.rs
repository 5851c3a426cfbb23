// Yahoo chart API response decoding
use crate::model::{FetchError, Series};
use serde::Deserialize;

pub trait Parser {
    fn parse(&self, body: &str) -> Result<Series, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Decoder for the `v8/finance/chart` JSON body.
pub struct ChartParser;

impl ChartParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ChartParser {
    fn parse(&self, body: &str) -> Result<Series, FetchError> {
        let response: ChartResponse = serde_json::from_str(body)?;

        if let Some(err) = response.chart.error {
            return Err(FetchError::Decode(format!(
                "chart API error [{}]: {}",
                err.code, err.description
            )));
        }

        let data = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| FetchError::Decode("no result in chart response".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Decode("no quote block in chart response".into()))?;

        // Missing sessions come back as null. A session missing either price
        // gets a zero open, which keeps the arrays aligned and is skipped by
        // the analyzer.
        let opens = quote
            .open
            .iter()
            .enumerate()
            .map(|(i, open)| match (open, quote.close.get(i)) {
                (Some(open), Some(Some(_)) | None) => *open,
                _ => 0.0,
            })
            .collect();
        let closes = quote.close.iter().map(|v| v.unwrap_or(0.0)).collect();
        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        Ok(Series::new(data.timestamp, opens, closes).with_utc_offset(offset))
    }
}

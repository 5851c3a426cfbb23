use crate::model::Timeframe;
use std::collections::HashSet;

/// Splits a comma-separated ticker list, trimming whitespace and dropping
/// blanks and repeats. The first occurrence keeps its position.
pub fn normalize_tickers(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}

/// Drops repeated timeframes, keeping the first occurrence.
pub fn normalize_timeframes(timeframes: &[Timeframe]) -> Vec<Timeframe> {
    let mut seen = HashSet::new();
    timeframes
        .iter()
        .copied()
        .filter(|tf| seen.insert(*tf))
        .collect()
}

use crate::model::{AnalysisResult, Timeframe, VolatilityStats};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// One grid entry of the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Stats(VolatilityStats),
    Error,
    /// No task ever reported for this pair.
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Stats(stats) => write!(f, "{}", stats),
            Cell::Error => f.write_str("ERR"),
            Cell::Missing => f.write_str("N/A"),
        }
    }
}

/// Timeframe rows by ticker columns, in the order the run was requested.
#[derive(Debug, Clone)]
pub struct ResultMatrix {
    timeframes: Vec<Timeframe>,
    tickers: Vec<String>,
    rows: HashMap<Timeframe, HashMap<String, Cell>>,
}

impl ResultMatrix {
    /// Folds finished results into the grid. Arrival order of `results` has
    /// no effect on the outcome.
    pub fn assemble(
        tickers: &[String],
        timeframes: &[Timeframe],
        results: impl IntoIterator<Item = AnalysisResult>,
    ) -> Self {
        let mut rows: HashMap<Timeframe, HashMap<String, Cell>> = timeframes
            .iter()
            .map(|&tf| (tf, HashMap::with_capacity(tickers.len())))
            .collect();

        for result in results {
            let Some(row) = rows.get_mut(&result.timeframe) else {
                warn!("Dropping result for unrequested timeframe {}", result.timeframe);
                continue;
            };
            if !tickers.contains(&result.ticker) {
                warn!("Dropping result for unrequested ticker {}", result.ticker);
                continue;
            }
            if row.contains_key(&result.ticker) {
                warn!(
                    "Duplicate result for {} [{}], keeping the first",
                    result.ticker, result.timeframe
                );
                continue;
            }

            let cell = match result.outcome {
                Ok(stats) => Cell::Stats(stats),
                Err(_) => Cell::Error,
            };
            row.insert(result.ticker, cell);
        }

        Self {
            timeframes: timeframes.to_vec(),
            tickers: tickers.to_vec(),
            rows,
        }
    }

    pub fn timeframes(&self) -> &[Timeframe] {
        &self.timeframes
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn cell(&self, timeframe: Timeframe, ticker: &str) -> Cell {
        self.rows
            .get(&timeframe)
            .and_then(|row| row.get(ticker))
            .copied()
            .unwrap_or(Cell::Missing)
    }

    /// Cells of one row, ordered like `tickers()`.
    pub fn row(&self, timeframe: Timeframe) -> Vec<Cell> {
        self.tickers
            .iter()
            .map(|ticker| self.cell(timeframe, ticker))
            .collect()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.timeframes.iter().flat_map(|&tf| self.row(tf))
    }

    pub fn count(&self, predicate: impl Fn(&Cell) -> bool) -> usize {
        self.cells().filter(|c| predicate(c)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalyzeError, PairError};

    fn ok(ticker: &str, timeframe: Timeframe, pct: f64) -> AnalysisResult {
        AnalysisResult {
            ticker: ticker.to_string(),
            timeframe,
            outcome: Ok(VolatilityStats {
                avg_abs_move_pct: pct,
                avg_monthly_red_days: 2,
            }),
        }
    }

    fn failed(ticker: &str, timeframe: Timeframe) -> AnalysisResult {
        AnalysisResult {
            ticker: ticker.to_string(),
            timeframe,
            outcome: Err(PairError::Analyze(AnalyzeError::NoValidData)),
        }
    }

    fn tickers() -> Vec<String> {
        vec!["NVDA".to_string(), "MSFT".to_string()]
    }

    #[test]
    fn cells_render_like_the_report() {
        let stats = VolatilityStats {
            avg_abs_move_pct: 1.234,
            avg_monthly_red_days: 4,
        };
        assert_eq!(Cell::Stats(stats).to_string(), "Avg Abs: 1.23% / Red: 4 days");
        assert_eq!(Cell::Error.to_string(), "ERR");
        assert_eq!(Cell::Missing.to_string(), "N/A");
    }

    #[test]
    fn unreported_pairs_are_missing() {
        let tf = [Timeframe::YearToDate, Timeframe::OneYear];
        let matrix = ResultMatrix::assemble(&tickers(), &tf, vec![ok("NVDA", Timeframe::OneYear, 3.0)]);

        assert!(matches!(matrix.cell(Timeframe::OneYear, "NVDA"), Cell::Stats(_)));
        assert_eq!(matrix.cell(Timeframe::OneYear, "MSFT"), Cell::Missing);
        assert_eq!(matrix.count(|c| *c == Cell::Missing), 3);
    }

    #[test]
    fn failures_become_error_cells() {
        let tf = [Timeframe::FiveYears];
        let matrix = ResultMatrix::assemble(
            &tickers(),
            &tf,
            vec![failed("MSFT", Timeframe::FiveYears), ok("NVDA", Timeframe::FiveYears, 2.5)],
        );
        assert_eq!(matrix.row(Timeframe::FiveYears)[1], Cell::Error);
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let tf = Timeframe::ALL;
        let mut results = Vec::new();
        for (i, t) in tf.iter().enumerate() {
            results.push(ok("NVDA", *t, i as f64));
            results.push(ok("MSFT", *t, 10.0 + i as f64));
        }
        let forward = ResultMatrix::assemble(&tickers(), &tf, results);

        let mut reversed_results = Vec::new();
        for (i, t) in tf.iter().enumerate().rev() {
            reversed_results.push(ok("MSFT", *t, 10.0 + i as f64));
            reversed_results.push(ok("NVDA", *t, i as f64));
        }
        let backward = ResultMatrix::assemble(&tickers(), &tf, reversed_results);

        for t in tf {
            assert_eq!(forward.row(t), backward.row(t));
        }
    }

    #[test]
    fn first_result_wins_and_strays_are_ignored() {
        let tf = [Timeframe::TenYears];
        let matrix = ResultMatrix::assemble(
            &tickers(),
            &tf,
            vec![
                ok("NVDA", Timeframe::TenYears, 1.0),
                failed("NVDA", Timeframe::TenYears),
                ok("AAPL", Timeframe::TenYears, 1.0),
                ok("MSFT", Timeframe::YearToDate, 1.0),
            ],
        );

        assert!(matches!(matrix.cell(Timeframe::TenYears, "NVDA"), Cell::Stats(_)));
        assert_eq!(matrix.cell(Timeframe::TenYears, "MSFT"), Cell::Missing);
        assert_eq!(matrix.cell(Timeframe::TenYears, "AAPL"), Cell::Missing);
    }
}

use crate::analyzer::monthly::{MonthKey, MonthlyTally};
use crate::model::{AnalyzeError, Series, VolatilityStats};
use tracing::trace;

/// Trait defining the interface for a price series analyzer.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, series: &Series) -> Result<VolatilityStats, AnalyzeError>;
}

/// Average absolute daily move and average red days per month.
pub struct VolatilityAnalyzer {
    red_threshold_ratio: f64,
}

impl VolatilityAnalyzer {
    pub fn new() -> Self {
        Self::with_ratio(1.0)
    }

    /// A day is red when its move is below `-avg_abs_move * ratio`.
    pub fn with_ratio(red_threshold_ratio: f64) -> Self {
        Self { red_threshold_ratio }
    }
}

impl Default for VolatilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for VolatilityAnalyzer {
    /// Two passes over the series: the first finds the average absolute
    /// open-to-close move and the months traded, the second counts the days
    /// whose decline exceeds that average.
    fn analyze(&self, series: &Series) -> Result<VolatilityStats, AnalyzeError> {
        let points = series.points()?;

        let mut tally = MonthlyTally::default();
        let mut moves: Vec<(MonthKey, f64)> = Vec::with_capacity(points.len());
        let mut sum_abs = 0.0;

        for point in &points {
            if point.open == 0.0 {
                continue;
            }
            let move_pct = (point.close - point.open) / point.open * 100.0;
            sum_abs += move_pct.abs();

            let key = MonthKey::of(point.date);
            tally.record_trading_day(key);
            moves.push((key, move_pct));
        }

        if moves.is_empty() {
            return Err(AnalyzeError::NoValidData);
        }

        let avg_abs_move_pct = sum_abs / moves.len() as f64;
        let threshold = -avg_abs_move_pct * self.red_threshold_ratio;

        for &(key, move_pct) in &moves {
            if move_pct < threshold {
                tally.record_red_day(key);
            }
        }

        trace!(
            "{} valid of {} sessions over {} months, threshold {:.4}%",
            moves.len(),
            points.len(),
            tally.months(),
            threshold
        );

        Ok(VolatilityStats {
            avg_abs_move_pct,
            avg_monthly_red_days: tally.average_red_days(),
        })
    }
}

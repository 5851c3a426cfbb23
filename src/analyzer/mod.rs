// Analyzer module: per-series volatility statistics.

pub mod price_analysis;
pub mod monthly;

// Re-export the main Analyzer implementation for ease of use.
pub use price_analysis::{Analyzer, VolatilityAnalyzer};

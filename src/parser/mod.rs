// Parser module: turns raw data-source responses into series.

pub mod chart_parser;

pub use chart_parser::{ChartParser, Parser};

pub mod traits;
pub mod yahoo;

pub use traits::TimeSeriesFetcher;
pub use yahoo::YahooFetcher;

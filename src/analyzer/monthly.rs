use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Calendar year-month a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthBucket {
    pub trading_days: u32,
    pub red_days: u32,
}

/// Per-month counters for a single series. Buckets only exist for months
/// that saw at least one trading day.
#[derive(Debug, Default)]
pub struct MonthlyTally {
    buckets: HashMap<MonthKey, MonthBucket>,
}

impl MonthlyTally {
    pub fn record_trading_day(&mut self, key: MonthKey) {
        self.buckets.entry(key).or_default().trading_days += 1;
    }

    /// Red days are only counted against months already holding trading days.
    pub fn record_red_day(&mut self, key: MonthKey) {
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.red_days += 1;
        }
    }

    pub fn months(&self) -> usize {
        self.buckets.len()
    }

    /// Red days per observed month, rounded half away from zero.
    pub fn average_red_days(&self) -> u32 {
        if self.buckets.is_empty() {
            return 0;
        }
        let total: u32 = self.buckets.values().map(|b| b.red_days).sum();
        (total as f64 / self.buckets.len() as f64).round() as u32
    }
}

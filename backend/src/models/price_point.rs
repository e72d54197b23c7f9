use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One charted observation. `normalized_return` is a percentage relative to the
// first point of the same series, so the first point always carries 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,        // serialized as YYYY-MM-DD
    pub price: f64,
    pub normalized_return: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64, normalized_return: f64) -> Self {
        Self {
            date,
            price,
            normalized_return,
        }
    }
}

/// Percentage change of `price` relative to `base`.
pub fn percent_change(price: f64, base: f64) -> f64 {
    (price - base) / base * 100.0
}

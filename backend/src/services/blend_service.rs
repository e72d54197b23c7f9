use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::external::price_provider::ExternalPricePoint;
use crate::models::{percent_change, PricePoint};

/// Index level the equal-weighted blend starts from.
pub const INDEX_BASE: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum BlendError {
    #[error("no price data to blend")]
    Empty,
    #[error("series {0} has an unusable baseline price")]
    BadBaseline(String),
    #[error("series share no common dates")]
    NoOverlap,
}

/// A two-asset portfolio held at constant weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWeightPair {
    pub first: &'static str,
    pub second: &'static str,
    pub first_weight: f64,
}

impl FixedWeightPair {
    pub fn second_weight(&self) -> f64 {
        1.0 - self.first_weight
    }
}

/// 60% SPY (S&P 500) / 40% TLT (20+ year treasuries).
pub const SIXTY_FORTY: FixedWeightPair = FixedWeightPair {
    first: "SPY",
    second: "TLT",
    first_weight: 0.6,
};

fn usable_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Collapse raw points into one price per date, ascending. The first
/// observation of a date wins; non-positive prices are dropped.
pub fn by_date(points: &[ExternalPricePoint]) -> BTreeMap<NaiveDate, f64> {
    let mut sorted: Vec<&ExternalPricePoint> = points.iter().collect();
    sorted.sort_by_key(|p| p.date);

    let mut out = BTreeMap::new();
    for p in sorted.into_iter().filter(|p| usable_price(p.close)) {
        out.entry(p.date).or_insert(p.close);
    }
    out
}

/// Turn one asset's raw history into a baseline-relative series.
pub fn to_return_series(points: &[ExternalPricePoint]) -> Vec<PricePoint> {
    let prices = by_date(points);
    let Some(&base) = prices.values().next() else {
        return Vec::new();
    };

    prices
        .into_iter()
        .map(|(date, price)| PricePoint::new(date, price, percent_change(price, base)))
        .collect()
}

/// Equal-weighted blend of several assets with possibly different coverage.
///
/// On each date in the union of all dates, the blended return is the mean of
/// the baseline-relative returns of only those assets priced on that date.
/// The price column is an index starting at [`INDEX_BASE`].
pub fn blend_equal_weighted(
    series: &BTreeMap<String, Vec<ExternalPricePoint>>,
) -> Result<Vec<PricePoint>, BlendError> {
    let per_asset: Vec<(&str, BTreeMap<NaiveDate, f64>)> = series
        .iter()
        .map(|(id, points)| (id.as_str(), by_date(points)))
        .filter(|(_, prices)| !prices.is_empty())
        .collect();

    if per_asset.is_empty() {
        return Err(BlendError::Empty);
    }

    let baselines: Vec<f64> = per_asset
        .iter()
        .map(|(_, prices)| prices.values().next().copied().unwrap_or(f64::NAN))
        .collect();

    let all_dates: BTreeSet<NaiveDate> = per_asset
        .iter()
        .flat_map(|(_, prices)| prices.keys().copied())
        .collect();

    let mut out = Vec::with_capacity(all_dates.len());
    for date in all_dates {
        let (sum, contributors) = per_asset
            .iter()
            .zip(baselines.iter())
            .filter_map(|((_, prices), base)| {
                prices.get(&date).map(|price| percent_change(*price, *base))
            })
            .fold((0.0, 0usize), |(sum, n), r| (sum + r, n + 1));

        if contributors == 0 {
            continue;
        }

        let avg_return = sum / contributors as f64;
        out.push(PricePoint::new(
            date,
            INDEX_BASE * (1.0 + avg_return / 100.0),
            avg_return,
        ));
    }

    debug!("Blended {} assets into {} points", per_asset.len(), out.len());

    if out.is_empty() {
        return Err(BlendError::Empty);
    }
    Ok(out)
}

/// Fixed-weight blend of two assets joined on date.
///
/// Returns are measured from each asset's close on the first shared date. The
/// price column is the weighted baseline level scaled by the blended return.
pub fn blend_fixed_weight(
    pair: &FixedWeightPair,
    first: &[ExternalPricePoint],
    second: &[ExternalPricePoint],
) -> Result<Vec<PricePoint>, BlendError> {
    let first_prices = by_date(first);
    let second_prices = by_date(second);

    if first_prices.is_empty() || second_prices.is_empty() {
        return Err(BlendError::Empty);
    }

    let joined: Vec<(NaiveDate, f64, f64)> = first_prices
        .iter()
        .filter_map(|(date, a)| second_prices.get(date).map(|b| (*date, *a, *b)))
        .collect();

    let unmatched = first_prices.len() + second_prices.len() - 2 * joined.len();
    if unmatched > 0 {
        warn!(
            "{}/{} dates do not line up; dropping {} unmatched points",
            pair.first, pair.second, unmatched
        );
    }

    let Some(&(_, base_first, base_second)) = joined.first() else {
        return Err(BlendError::NoOverlap);
    };

    let (w1, w2) = (pair.first_weight, pair.second_weight());
    let base_level = w1 * base_first + w2 * base_second;
    if !usable_price(base_level) {
        return Err(BlendError::BadBaseline(format!("{}/{}", pair.first, pair.second)));
    }

    Ok(joined
        .into_iter()
        .map(|(date, a, b)| {
            let blended = w1 * percent_change(a, base_first) + w2 * percent_change(b, base_second);
            PricePoint::new(date, base_level * (1.0 + blended / 100.0), blended)
        })
        .collect())
}

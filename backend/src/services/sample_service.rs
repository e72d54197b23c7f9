use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use crate::models::{percent_change, PricePoint, Timeframe};

/// Shape of a synthetic series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleProfile {
    pub base_price: f64,
    /// Daily percentage change range
    pub daily_change: RangeInclusive<f64>,
}

impl SampleProfile {
    pub fn crypto() -> Self {
        Self {
            base_price: 45_000.0,
            daily_change: -8.0..=12.0,
        }
    }

    pub fn traditional() -> Self {
        Self {
            base_price: 100.0,
            daily_change: -2.0..=3.0,
        }
    }
}

/// Random-walk series with one point per calendar day, ending at `today`.
///
/// The first point sits at the base price with a zero return; every later
/// price compounds a uniformly drawn daily change.
pub fn generate_with<R: Rng>(
    profile: &SampleProfile,
    timeframe: Timeframe,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PricePoint> {
    let days = i64::from(timeframe.days());
    let mut price = profile.base_price;

    (0..days)
        .map(|i| {
            let date = today - Duration::days(days - 1 - i);
            if i > 0 {
                let change = rng.random_range(profile.daily_change.clone());
                price *= 1.0 + change / 100.0;
            }
            PricePoint::new(date, price, percent_change(price, profile.base_price))
        })
        .collect()
}

pub fn generate(profile: &SampleProfile, timeframe: Timeframe) -> Vec<PricePoint> {
    generate_with(profile, timeframe, Utc::now().date_naive(), &mut rand::rng())
}

pub fn crypto_sample(timeframe: Timeframe) -> Vec<PricePoint> {
    generate(&SampleProfile::crypto(), timeframe)
}

pub fn traditional_sample(timeframe: Timeframe) -> Vec<PricePoint> {
    generate(&SampleProfile::traditional(), timeframe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_length_matches_timeframe() {
        let mut rng = StdRng::seed_from_u64(7);
        for tf in Timeframe::ALL_VARIANTS {
            let series = generate_with(&SampleProfile::crypto(), tf, today(), &mut rng);
            assert_eq!(series.len(), tf.days() as usize);
        }
    }

    #[test]
    fn test_dates_are_consecutive_and_end_today() {
        let mut rng = StdRng::seed_from_u64(1);
        let series = generate_with(&SampleProfile::traditional(), Timeframe::OneMonth, today(), &mut rng);

        assert_eq!(series.last().unwrap().date, today());
        assert_eq!(series[0].date, today() - Duration::days(29));
        for pair in series.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_first_point_is_base() {
        let mut rng = StdRng::seed_from_u64(99);
        let series = generate_with(&SampleProfile::crypto(), Timeframe::SixMonths, today(), &mut rng);

        assert_eq!(series[0].price, 45_000.0);
        assert_eq!(series[0].normalized_return, 0.0);
    }

    #[test]
    fn test_daily_moves_stay_in_range() {
        let profile = SampleProfile::traditional();
        let mut rng = StdRng::seed_from_u64(42);
        let series = generate_with(&profile, Timeframe::OneYear, today(), &mut rng);

        for pair in series.windows(2) {
            let change = percent_change(pair[1].price, pair[0].price);
            assert!(change >= -2.0 - 1e-9 && change <= 3.0 + 1e-9, "change {} out of range", change);
        }
    }

    #[test]
    fn test_returns_track_price() {
        let mut rng = StdRng::seed_from_u64(3);
        let series = generate_with(&SampleProfile::crypto(), Timeframe::OneMonth, today(), &mut rng);

        for p in &series {
            let expected = percent_change(p.price, 45_000.0);
            assert!((p.normalized_return - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_public_generators() {
        assert_eq!(crypto_sample(Timeframe::OneMonth).len(), 30);
        assert_eq!(traditional_sample(Timeframe::OneYear).len(), 365);
    }
}

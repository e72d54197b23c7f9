use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chart window selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

#[derive(Debug, Error, PartialEq)]
#[error("Invalid timeframe. Use 1M, 6M, 1Y, or ALL")]
pub struct InvalidTimeframe(pub String);

/// Inclusive calendar window ending at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Timeframe {
    #[cfg(test)]
    pub const ALL_VARIANTS: [Timeframe; 4] = [
        Timeframe::OneMonth,
        Timeframe::SixMonths,
        Timeframe::OneYear,
        Timeframe::All,
    ];

    /// Lenient resolution: unknown tokens land in the `ALL` bucket.
    /// Request validation goes through `FromStr` instead.
    #[cfg(test)]
    pub fn resolve(token: &str) -> Self {
        token.parse().unwrap_or(Timeframe::All)
    }

    pub fn days(self) -> u32 {
        match self {
            Timeframe::OneMonth => 30,
            Timeframe::SixMonths => 180,
            Timeframe::OneYear => 365,
            Timeframe::All => 1825, // ~5 years
        }
    }

    pub fn date_range(self, today: NaiveDate) -> DateRange {
        DateRange {
            start: today - Duration::days(i64::from(self.days())),
            end: today,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneMonth => "1M",
            Timeframe::SixMonths => "6M",
            Timeframe::OneYear => "1Y",
            Timeframe::All => "ALL",
        }
    }
}

impl FromStr for Timeframe {
    type Err = InvalidTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1M" => Ok(Timeframe::OneMonth),
            "6M" => Ok(Timeframe::SixMonths),
            "1Y" => Ok(Timeframe::OneYear),
            "ALL" => Ok(Timeframe::All),
            other => Err(InvalidTimeframe(other.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_counts() {
        assert_eq!(Timeframe::OneMonth.days(), 30);
        assert_eq!(Timeframe::SixMonths.days(), 180);
        assert_eq!(Timeframe::OneYear.days(), 365);
        assert_eq!(Timeframe::All.days(), 1825);
    }

    #[test]
    fn test_parse_is_strict() {
        for tf in Timeframe::ALL_VARIANTS {
            assert_eq!(tf.as_str().parse::<Timeframe>(), Ok(tf));
        }
        assert!("2Y".parse::<Timeframe>().is_err());
        assert!("1m".parse::<Timeframe>().is_err());
        assert!("".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_resolve_defaults_to_all() {
        assert_eq!(Timeframe::resolve("1Y"), Timeframe::OneYear);
        assert_eq!(Timeframe::resolve("2Y"), Timeframe::All);
        assert_eq!(Timeframe::resolve("garbage"), Timeframe::All);
    }

    #[test]
    fn test_date_range_ends_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let range = Timeframe::OneMonth.date_range(today);
        assert_eq!(range.end, today);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_serializes_as_token() {
        let json = serde_json::to_string(&Timeframe::All).unwrap();
        assert_eq!(json, "\"ALL\"");
        let tf: Timeframe = serde_json::from_str("\"6M\"").unwrap();
        assert_eq!(tf, Timeframe::SixMonths);
    }
}

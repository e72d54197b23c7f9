use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{CryptoMarket, DateRange};

/// A raw daily observation as returned by an upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl ExternalPricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

impl From<reqwest::Error> for PriceProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PriceProviderError::Parse(e.to_string())
        } else {
            PriceProviderError::Network(e.to_string())
        }
    }
}

/// Which pipeline a market-chart call serves. The single-asset route gets a
/// longer timeout than each call of the ten-coin portfolio loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScope {
    SingleAsset,
    Portfolio,
}

/// Daily closes for exchange-traded tickers.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError>;
}

/// Spot-price history and market listings for crypto assets.
#[async_trait]
pub trait CryptoMarketProvider: Send + Sync {
    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        days: u32,
        scope: ChartScope,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError>;

    async fn fetch_top_markets(
        &self,
        limit: u32,
    ) -> Result<Vec<CryptoMarket>, PriceProviderError>;
}

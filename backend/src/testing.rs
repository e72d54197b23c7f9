//! In-memory providers for exercising the pipelines and routes.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use parking_lot::Mutex;

use crate::external::price_provider::{
    ChartScope, CryptoMarketProvider, ExternalPricePoint, PriceProvider, PriceProviderError,
};
use crate::models::{CryptoMarket, DateRange};

/// `len` daily points ending at `end`: the first at `base`, every later one
/// `final_return` percent above it.
pub fn flat_history(end: NaiveDate, len: usize, base: f64, final_return: f64) -> Vec<ExternalPricePoint> {
    (0..len)
        .map(|i| {
            let date = end - Duration::days((len - 1 - i) as i64);
            let price = if i == 0 { base } else { base * (1.0 + final_return / 100.0) };
            ExternalPricePoint::new(date, price)
        })
        .collect()
}

#[derive(Default)]
pub struct FakeCryptoProvider {
    history: Option<Vec<ExternalPricePoint>>,
    failing: HashSet<String>,
    requested: Mutex<Vec<String>>,
    scopes: Mutex<Vec<ChartScope>>,
}

impl FakeCryptoProvider {
    pub fn with_history(history: Vec<ExternalPricePoint>) -> Self {
        Self {
            history: Some(history),
            ..Default::default()
        }
    }

    /// Every call fails with a network error.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, ids: &[&str]) -> Self {
        self.failing.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().len()
    }

    pub fn scopes(&self) -> Vec<ChartScope> {
        self.scopes.lock().clone()
    }
}

#[async_trait]
impl CryptoMarketProvider for FakeCryptoProvider {
    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        _days: u32,
        scope: ChartScope,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        self.requested.lock().push(coin_id.to_string());
        self.scopes.lock().push(scope);
        match &self.history {
            Some(history) if !self.failing.contains(coin_id) => Ok(history.clone()),
            _ => Err(PriceProviderError::Network("connection refused".into())),
        }
    }

    async fn fetch_top_markets(&self, limit: u32) -> Result<Vec<CryptoMarket>, PriceProviderError> {
        self.requested.lock().push("markets".to_string());
        if self.history.is_none() {
            return Err(PriceProviderError::Network("connection refused".into()));
        }
        Ok((1..=limit.min(3))
            .map(|rank| CryptoMarket {
                id: format!("coin-{rank}"),
                symbol: format!("C{rank}"),
                name: format!("Coin {rank}"),
                market_cap_rank: Some(rank),
                current_price: Some(1.0),
                market_cap: Some(1_000.0),
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FakeTraditionalProvider {
    history: HashMap<String, Vec<ExternalPricePoint>>,
    calls: Mutex<usize>,
}

impl FakeTraditionalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ticker: &str, points: Vec<ExternalPricePoint>) -> Self {
        self.history.insert(ticker.to_string(), points);
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl PriceProvider for FakeTraditionalProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        _range: DateRange,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        *self.calls.lock() += 1;
        self.history
            .get(ticker)
            .cloned()
            .ok_or(PriceProviderError::NotFound)
    }
}

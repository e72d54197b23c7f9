use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use crate::config::CoinGeckoConfig;
use crate::external::price_provider::{
    ChartScope, CryptoMarketProvider, ExternalPricePoint, PriceProviderError,
};
use crate::models::CryptoMarket;
use crate::services::rate_limiter::RateLimiter;

const USER_AGENT: &str = "Financial-Chart-App/1.0";

/// CoinGecko v3 client.
///
/// Every call goes through a shared [`RateLimiter`] so that consecutive
/// requests are spaced by the configured delay, which keeps the free tier
/// from answering with 429s during the ten-coin portfolio fetch.
pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: String,
    chart_timeout: Duration,
    asset_chart_timeout: Duration,
    listing_timeout: Duration,
    limiter: RateLimiter,
}

impl CoinGeckoProvider {
    pub fn new(config: &CoinGeckoConfig) -> Result<Self, PriceProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chart_timeout: config.chart_timeout,
            asset_chart_timeout: config.asset_chart_timeout,
            listing_timeout: config.listing_timeout,
            limiter: RateLimiter::new(1, config.request_delay),
        })
    }

    fn chart_timeout_for(&self, scope: ChartScope) -> Duration {
        match scope {
            ChartScope::SingleAsset => self.asset_chart_timeout,
            ChartScope::Portfolio => self.chart_timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Option<Vec<(f64, f64)>>,
}

#[derive(Debug, Deserialize)]
struct MarketListingItem {
    id: String,
    symbol: String,
    name: String,
    market_cap_rank: Option<u32>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
}

fn epoch_ms_to_point(epoch_ms: f64, price: f64) -> Result<ExternalPricePoint, PriceProviderError> {
    let date = DateTime::from_timestamp_millis(epoch_ms as i64)
        .ok_or_else(|| PriceProviderError::Parse(format!("bad timestamp {}", epoch_ms)))?
        .date_naive();
    Ok(ExternalPricePoint::new(date, price))
}

#[async_trait]
impl CryptoMarketProvider for CoinGeckoProvider {
    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        days: u32,
        scope: ChartScope,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);

        let _guard = self.limiter
            .acquire()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let days = days.to_string();
        debug!("GET {} (days={}, {:?})", url, days, scope);
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", "daily"),
            ])
            .timeout(self.chart_timeout_for(scope))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: MarketChartResponse = resp.json().await?;

        let prices = body.prices
            .filter(|p| !p.is_empty())
            .ok_or_else(|| PriceProviderError::BadResponse("no prices in response".into()))?;

        let mut points = prices
            .into_iter()
            .map(|(ts, price)| epoch_ms_to_point(ts, price))
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps upstream order among same-day entries
        points.sort_by_key(|p| p.date);

        Ok(points)
    }

    async fn fetch_top_markets(
        &self,
        limit: u32,
    ) -> Result<Vec<CryptoMarket>, PriceProviderError> {
        let url = format!("{}/coins/markets", self.base_url);

        let _guard = self.limiter
            .acquire()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let per_page = limit.to_string();
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ])
            .timeout(self.listing_timeout)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let items: Vec<MarketListingItem> = resp.json().await?;

        Ok(items
            .into_iter()
            .take(limit as usize)
            .map(|m| CryptoMarket {
                id: m.id,
                symbol: m.symbol.to_uppercase(),
                name: m.name,
                market_cap_rank: m.market_cap_rank,
                current_price: m.current_price,
                market_cap: m.market_cap,
            })
            .collect())
    }
}

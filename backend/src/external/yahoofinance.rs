use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::config::YahooConfig;
use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};
use crate::models::DateRange;

/// Yahoo Finance chart API. No API key required.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(config: &YahooConfig) -> Result<Self, PriceProviderError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; PerfChart/0.1)")
            .timeout(config.timeout)
            .build()
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn with_timeout(base_url: &str, timeout: std::time::Duration) -> Result<Self, PriceProviderError> {
        Self::new(&YahooConfig {
            base_url: base_url.to_string(),
            timeout,
        })
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Midnight UTC of `date` as unix seconds.
fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        range: DateRange,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        // period2 is exclusive, so push it to the start of the following day
        let period1 = unix_seconds(range.start).to_string();
        let period2 = range.end
            .checked_add_days(Days::new(1))
            .map(unix_seconds)
            .unwrap_or_else(|| unix_seconds(range.end))
            .to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("interval", "1d"),
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if !resp.status().is_success() {
            if resp.status().as_u16() == 404 {
                return Err(PriceProviderError::NotFound);
            }
            return Err(PriceProviderError::BadResponse(
                format!("HTTP {}", resp.status())
            ));
        }

        let body: YahooChartResponse = resp.json().await?;

        if let Some(error) = body.chart.error {
            if error.description.contains("No data found") {
                return Err(PriceProviderError::NotFound);
            }
            return Err(PriceProviderError::BadResponse(error.description));
        }

        let result = body.chart.result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
            .ok_or(PriceProviderError::NotFound)?;

        let closes = &result.indicators.quote
            .first()
            .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?
            .close;

        if result.timestamp.len() != closes.len() {
            return Err(PriceProviderError::Parse(
                "Timestamp and close price arrays have different lengths".into()
            ));
        }

        let mut points: Vec<ExternalPricePoint> = result.timestamp
            .iter()
            .zip(closes.iter())
            .filter_map(|(timestamp, close_opt)| {
                // Null closes show up on market holidays
                let close = (*close_opt)?;
                let date = chrono::DateTime::from_timestamp(*timestamp, 0)
                    .map(|dt| dt.date_naive())?;
                Some(ExternalPricePoint::new(date, close))
            })
            .collect();

        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);

        Ok(points)
    }
}

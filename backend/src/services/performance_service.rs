use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::errors::{AppError, LISTING_UNAVAILABLE, PERFORMANCE_UNAVAILABLE};
use crate::external::price_provider::{ChartScope, CryptoMarketProvider, PriceProvider};
use crate::models::{
    AssetPerformanceResponse, CryptoMarket, PerformanceResponse, SeriesResult, Timeframe,
};
use crate::services::blend_service::{self, FixedWeightPair, SIXTY_FORTY};
use crate::services::sample_service;
use crate::services::worker_pool::WorkerPoolError;
use crate::state::AppState;

/// CoinGecko ids of the ten assets in the equal-weighted crypto portfolio.
pub const TOP_CRYPTOS: [&str; 10] = [
    "bitcoin",
    "ethereum",
    "binancecoin",
    "solana",
    "xrp",
    "cardano",
    "avalanche-2",
    "dogecoin",
    "polkadot",
    "chainlink",
];

pub const MAX_TOP_CRYPTOS: u32 = 250;

/// Baseline-relative history for one crypto asset, or a synthetic series if
/// the upstream call fails or returns nothing usable.
pub async fn crypto_asset_series(
    provider: &dyn CryptoMarketProvider,
    coin_id: &str,
    timeframe: Timeframe,
) -> SeriesResult {
    match provider
        .fetch_market_chart(coin_id, timeframe.days(), ChartScope::SingleAsset)
        .await
    {
        Ok(points) => {
            let series = blend_service::to_return_series(&points);
            if series.is_empty() {
                warn!("No usable prices for {}, using sample data", coin_id);
                return SeriesResult::synthetic(sample_service::crypto_sample(timeframe));
            }
            SeriesResult::live(series)
        }
        Err(e) => {
            warn!("Failed to fetch {} from crypto provider: {}. Using sample data", coin_id, e);
            SeriesResult::synthetic(sample_service::crypto_sample(timeframe))
        }
    }
}

/// Equal-weighted portfolio over `coins`.
///
/// Assets are fetched one after another; the provider paces the calls.
/// Assets that fail are left out of the blend. If none succeed the result is
/// a single synthetic series.
pub async fn crypto_portfolio_series(
    provider: &dyn CryptoMarketProvider,
    coins: &[&str],
    timeframe: Timeframe,
) -> SeriesResult {
    let mut fetched = BTreeMap::new();

    for coin_id in coins {
        match provider
            .fetch_market_chart(coin_id, timeframe.days(), ChartScope::Portfolio)
            .await
        {
            Ok(points) if !points.is_empty() => {
                fetched.insert(coin_id.to_string(), points);
            }
            Ok(_) => warn!("Empty price history for {}, skipping", coin_id),
            Err(e) => warn!("Failed to fetch {}: {}", coin_id, e),
        }
    }

    if fetched.is_empty() {
        warn!("No crypto data fetched, using sample data");
        return SeriesResult::synthetic(sample_service::crypto_sample(timeframe));
    }

    info!("✓ Fetched {}/{} crypto assets for {}", fetched.len(), coins.len(), timeframe);

    match blend_service::blend_equal_weighted(&fetched) {
        Ok(points) => SeriesResult::live(points),
        Err(e) => {
            warn!("Crypto portfolio blend failed: {}. Using sample data", e);
            SeriesResult::synthetic(sample_service::crypto_sample(timeframe))
        }
    }
}

/// Fixed-weight two-asset portfolio over the timeframe's window ending `today`.
pub async fn traditional_series(
    provider: &dyn PriceProvider,
    pair: &FixedWeightPair,
    timeframe: Timeframe,
    today: NaiveDate,
) -> SeriesResult {
    let range = timeframe.date_range(today);

    let (first, second) = tokio::join!(
        provider.fetch_daily_history(pair.first, range),
        provider.fetch_daily_history(pair.second, range),
    );

    let (first, second) = match (first, second) {
        (Ok(a), Ok(b)) if !a.is_empty() && !b.is_empty() => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Failed to fetch {}/{} history: {}. Using sample data", pair.first, pair.second, e);
            return SeriesResult::synthetic(sample_service::traditional_sample(timeframe));
        }
        _ => {
            warn!("Empty {}/{} history, using sample data", pair.first, pair.second);
            return SeriesResult::synthetic(sample_service::traditional_sample(timeframe));
        }
    };

    match blend_service::blend_fixed_weight(pair, &first, &second) {
        Ok(points) => SeriesResult::live(points),
        Err(e) => {
            warn!("{}/{} blend failed: {}. Using sample data", pair.first, pair.second, e);
            SeriesResult::synthetic(sample_service::traditional_sample(timeframe))
        }
    }
}

fn pipeline_output<T>(
    label: &str,
    public: &'static str,
    result: Result<Result<T, WorkerPoolError>, JoinError>,
) -> Result<T, AppError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!("{} pipeline not run: {}", label, e);
            Err(AppError::Internal { public, detail: e.to_string() })
        }
        Err(e) => {
            error!("{} pipeline task failed: {}", label, e);
            Err(AppError::Internal { public, detail: e.to_string() })
        }
    }
}

/// Crypto portfolio vs. 60/40 for one timeframe. Both pipelines run
/// concurrently on the worker pool.
pub async fn get_performance(
    state: &AppState,
    timeframe: Timeframe,
) -> Result<PerformanceResponse, AppError> {
    let crypto_provider = state.crypto_provider.clone();
    let crypto = state.worker_pool.spawn(async move {
        crypto_portfolio_series(crypto_provider.as_ref(), &TOP_CRYPTOS, timeframe).await
    });

    let traditional_provider = state.traditional_provider.clone();
    let traditional = state.worker_pool.spawn(async move {
        let today = Utc::now().date_naive();
        traditional_series(traditional_provider.as_ref(), &SIXTY_FORTY, timeframe, today).await
    });

    let (crypto, traditional) = tokio::join!(crypto, traditional);
    let crypto = pipeline_output("crypto", PERFORMANCE_UNAVAILABLE, crypto)?;
    let traditional = pipeline_output("traditional", PERFORMANCE_UNAVAILABLE, traditional)?;

    Ok(PerformanceResponse::new(timeframe, crypto, traditional))
}

/// CoinGecko ids are lowercase slugs like `avalanche-2`.
pub fn validate_coin_id(coin_id: &str) -> Result<(), AppError> {
    let valid = !coin_id.is_empty()
        && coin_id.len() <= 64
        && coin_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid coin id: {}", coin_id)))
    }
}

pub async fn get_asset_performance(
    state: &AppState,
    coin_id: String,
    timeframe: Timeframe,
) -> Result<AssetPerformanceResponse, AppError> {
    validate_coin_id(&coin_id)?;

    let provider = state.crypto_provider.clone();
    let id = coin_id.clone();
    let handle = state.worker_pool.spawn(async move {
        crypto_asset_series(provider.as_ref(), &id, timeframe).await
    });
    let series = pipeline_output("crypto asset", PERFORMANCE_UNAVAILABLE, handle.await)?;

    Ok(AssetPerformanceResponse {
        coin_id,
        timeframe,
        source: series.source,
        data: series.points,
    })
}

/// Market-cap ranked listing. Upstream failures yield an empty list.
pub async fn get_top_cryptos(state: &AppState, limit: u32) -> Result<Vec<CryptoMarket>, AppError> {
    let limit = limit.clamp(1, MAX_TOP_CRYPTOS);
    let provider = state.crypto_provider.clone();

    let handle = state.worker_pool.spawn(async move {
        match provider.fetch_top_markets(limit).await {
            Ok(markets) => markets,
            Err(e) => {
                warn!("Failed to fetch top cryptos: {}", e);
                Vec::new()
            }
        }
    });

    pipeline_output("top cryptos", LISTING_UNAVAILABLE, handle.await)
}

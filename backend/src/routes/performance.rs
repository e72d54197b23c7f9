use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{AssetPerformanceResponse, PerformanceResponse, Timeframe};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:timeframe", get(get_performance))
        .route("/:timeframe/crypto/:coin_id", get(get_asset_performance))
}

pub async fn get_performance(
    Path(timeframe): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PerformanceResponse>, AppError> {
    info!("GET /api/performance/{} - Crypto vs 60/40", timeframe);
    let timeframe: Timeframe = timeframe.parse()?;

    services::performance_service::get_performance(&state, timeframe)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error in get_performance for {}: {}", timeframe, e);
            e
        })
}

pub async fn get_asset_performance(
    Path((timeframe, coin_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<AssetPerformanceResponse>, AppError> {
    info!("GET /api/performance/{}/crypto/{} - Single asset", timeframe, coin_id);
    let timeframe: Timeframe = timeframe.parse()?;

    services::performance_service::get_asset_performance(&state, coin_id, timeframe)
        .await
        .map(Json)
}

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{AssetsInfo, CryptoMarket};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/info", get(get_assets_info))
        .route("/top-cryptos", get(get_top_cryptos))
}

#[derive(Debug, Deserialize)]
struct TopCryptosQuery {
    limit: Option<u32>,
}

async fn get_assets_info() -> Json<AssetsInfo> {
    info!("GET /api/assets/info - Asset metadata");
    Json(AssetsInfo::comparison())
}

async fn get_top_cryptos(
    Query(params): Query<TopCryptosQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CryptoMarket>>, AppError> {
    let limit = params.limit.unwrap_or(100);
    info!("GET /api/assets/top-cryptos - Top {} by market cap", limit);

    services::performance_service::get_top_cryptos(&state, limit)
        .await
        .map(Json)
}

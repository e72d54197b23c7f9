use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api", get(api_info))
        .route("/api/", get(api_info))
}

async fn api_info() -> Json<Value> {
    info!("GET /api - API info");
    Json(json!({ "message": "Financial Performance Chart API" }))
}

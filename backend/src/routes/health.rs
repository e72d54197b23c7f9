use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    workers_total: usize,
    workers_idle: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("GET /health - Health check");
    Json(HealthResponse {
        status: "OK",
        workers_total: state.worker_pool.size(),
        workers_idle: state.worker_pool.available(),
    })
}

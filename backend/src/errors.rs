use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::models::InvalidTimeframe;

pub const PERFORMANCE_UNAVAILABLE: &str = "Failed to fetch performance data";
pub const LISTING_UNAVAILABLE: &str = "Failed to fetch cryptocurrency listing";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    /// `detail` is for the logs; clients only ever see `public`.
    #[error("Internal error: {detail}")]
    Internal { public: &'static str, detail: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": msg }))).into_response()
            }
            AppError::Internal { public, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": public })),
            )
                .into_response(),
        }
    }
}

impl From<InvalidTimeframe> for AppError {
    fn from(value: InvalidTimeframe) -> Self {
        AppError::Validation(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let err = AppError::Internal {
            public: LISTING_UNAVAILABLE,
            detail: "worker pool is closed".to_string(),
        };
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], LISTING_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_validation_message_is_returned() {
        let (status, body) = body_of(AppError::Validation("Invalid coin id: X".into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid coin id: X");
    }
}

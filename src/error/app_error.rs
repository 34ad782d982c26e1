use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn body(&self) -> Value {
        match self {
            AppError::Store(err) => err.to_json(),
            AppError::BadRequest(msg) => json!({
                "name": "BadRequest",
                "message": msg,
            }),
            AppError::ConfigError(_) | AppError::Io(_) => json!({
                "name": "InternalError",
                "message": "Internal server error",
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Store failures are reported as client faults whatever their cause.
        let status = match self {
            AppError::Store(ref e) => {
                tracing::warn!(kind = e.kind(), "Store error: {}", e);
                StatusCode::BAD_REQUEST
            }
            AppError::BadRequest(ref msg) => {
                tracing::warn!("Rejected request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            AppError::ConfigError(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(self.body())).into_response()
    }
}

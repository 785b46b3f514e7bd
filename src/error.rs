use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("URL is required")]
    MissingUrl,

    /// Target site unreachable or non-success status. DNS failures,
    /// timeouts, 4xx and 5xx all collapse here; the underlying cause is
    /// logged but never exposed to the caller.
    #[error("Failed to fetch URL")]
    FetchFailed(String),

    #[error("{0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingUrl => StatusCode::BAD_REQUEST,
            AppError::FetchFailed(ref cause) => {
                tracing::warn!(%cause, "fetch failed");
                StatusCode::BAD_REQUEST
            }
            AppError::Internal(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

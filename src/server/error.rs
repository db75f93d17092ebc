//! HTTP error mapping.

use crate::utils::error::TarotError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No interpretation found for this UUID")]
    InterpretationNotFound,

    #[error("Could not draw cards: {0}")]
    Draw(#[from] TarotError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InterpretationNotFound => StatusCode::NOT_FOUND,
            ApiError::Draw(e) => {
                tracing::error!(error = %e, suggestion = %e.recovery_suggestion(), "Draw failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

//! Error types for the PDF generation server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfgen_core::PdfGenError;
use serde::Serialize;
use thiserror::Error;

/// Message used when a failure carries no usable text.
pub const FALLBACK_MESSAGE: &str = "Server error";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Generation(#[from] PdfGenError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("PDF generation timed out after {0}ms")]
    Timeout(u64),
}

/// Failure body: `{"message": "..."}`
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Generate request failed: {}", self);

        let message = match self.to_string() {
            m if m.trim().is_empty() => FALLBACK_MESSAGE.to_string(),
            m => m,
        };

        // Every failure shares one status.
        (StatusCode::FORBIDDEN, Json(ErrorResponse { message })).into_response()
    }
}

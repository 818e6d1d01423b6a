use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Export already in progress: {0}")]
    ExportInProgress(String),

    #[error("Export failed: {0}")]
    Export(#[from] RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ExportInProgress(name) => (
                StatusCode::CONFLICT,
                "EXPORT_IN_PROGRESS",
                format!("{name} is already being generated"),
            ),
            AppError::Export(e @ RenderError::DocumentTooLarge { .. }) => {
                tracing::warn!("Export refused: {e}");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "DOCUMENT_TOO_LARGE",
                    "The report is too long to export".to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                // One generic message regardless of which stage broke.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "The file could not be generated, please try again".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::ExportInProgress("a.pdf".into()), StatusCode::CONFLICT),
            (AppError::Export(RenderError::EmptyDocument), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Export(RenderError::DocumentTooLarge { height: 2, limit: 1 }),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}

//! Maps `marketing_core::AppError` to HTTP status + JSON body. The core
//! never depends on HTTP status codes (spec §7); that mapping lives here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marketing_core::AppError;
use serde_json::json;

pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AppError::InvalidRequest(msg) if msg.contains("exceeds") => {
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg }))
            }
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, json!({ "error": "authentication required" })),
            AppError::NotFound(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::DuplicateInGroup => {
                (StatusCode::CONFLICT, json!({ "error": "duplicate file in this group" }))
            }
            AppError::ValidationFailed { issues } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "generated content failed validation", "issues": issues }),
            ),
            AppError::AssertionFailed { issues } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "assertion_failed", "issues": issues }),
            ),
            AppError::LlmTransport(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
            AppError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

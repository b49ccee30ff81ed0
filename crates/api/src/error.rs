use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use sd3_core::RegistryError;
use sd3_storage::StorageError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// with an `error` message and a machine-readable `code`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A registry invariant was violated (duplicate id, bad transition).
    /// Should not occur given UUID v4 id generation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The result store rejected a request (presign failure on status).
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Registry(err) => {
                tracing::error!(error = %err, "Registry invariant violated");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Result store request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORAGE_ERROR",
                    "The result store rejected the request".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

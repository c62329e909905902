//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ppss_types::error::{ServiceError, SessionKeyError};

#[derive(Debug)]
pub enum AppError {
    /// Bad input or a business-rule refusal (400).
    Validation(String),
    /// Unknown route parameter such as a stage name (404).
    NotFound(String),
    /// Storage or gateway failure; carries the client-facing message only (500).
    Internal(String),
}

impl AppError {
    /// Map a service failure, logging the cause of anything that becomes a 500.
    ///
    /// `context` is the generic message returned to the client for internal
    /// failures.
    pub fn from_service(err: ServiceError, context: &str) -> Self {
        match err {
            ServiceError::Validation(_) | ServiceError::NothingToSummarize(_) => {
                AppError::Validation(err.to_string())
            }
            ServiceError::Gateway(_) | ServiceError::Storage(_) => {
                tracing::error!(error = %err, "{context}");
                AppError::Internal(context.to_string())
            }
        }
    }
}

impl From<SessionKeyError> for AppError {
    fn from(e: SessionKeyError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

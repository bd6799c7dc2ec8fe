//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Store failures are logged and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::FieldErrors;

/// Default message for a missing UF.
pub const NOT_FOUND_MESSAGE: &str = "UF não encontrada.";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400), body is the per-field report
    Validation(FieldErrors),

    /// Body could not be read as JSON (400/415/422)
    MalformedBody { status: StatusCode, detail: String },

    /// Resource not found (404)
    NotFound { message: &'static str },

    /// Store failure (500, logged); `message` is what the caller sees
    Store {
        message: &'static str,
        source: DbError,
    },
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound {
            message: NOT_FOUND_MESSAGE,
        }
    }

    /// Wrap a store failure with the operation's public message.
    ///
    /// ```ignore
    /// store.list_all().await.map_err(ApiError::store("Erro ao listar UFs."))?;
    /// ```
    pub fn store(message: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self::Store { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Self::MalformedBody { status, detail } => {
                (status, Json(json!({ "detail": detail }))).into_response()
            }
            Self::NotFound { message } => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            Self::Store { message, source } => {
                // Log the actual error, return generic message
                tracing::error!(
                    error = %source,
                    constraint_violation = source.is_constraint_violation(),
                    "{}",
                    message
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(e: FieldErrors) -> Self {
        Self::Validation(e)
    }
}

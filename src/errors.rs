//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Field-level error mapping returned to clients as `{"field": "message"}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), message.into());
        Self(map)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    // Validation, surfaced as a field -> message mapping
    #[error("Validation failed")]
    Validation(FieldErrors),

    // Lookup failures that carry field errors (session authentication)
    #[error("Lookup failed")]
    LookupFailed(FieldErrors),

    // Document-store structural validation failure
    #[error("Document rejected by the store")]
    DocumentRejected(FieldErrors),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Session error")]
    Session(#[from] tower_sessions::session::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for non-field errors
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::LookupFailed(_) => "NOT_FOUND",
            AppError::DocumentRejected(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound | AppError::LookupFailed(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) | AppError::DocumentRejected(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Session(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Session(e) => {
                tracing::error!("Session error: {:?}", e);
                "A session error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Re-express a validation failure as a 404 lookup failure.
    ///
    /// The session-authenticate endpoint reports every expected failure,
    /// including malformed input, as 404 with the field mapping.
    pub fn into_lookup_failed(self) -> Self {
        match self {
            AppError::Validation(fields) => AppError::LookupFailed(fields),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation(fields)
            | AppError::LookupFailed(fields)
            | AppError::DocumentRejected(fields) => (status, Json(fields)).into_response(),
            other => {
                let body = ErrorResponse {
                    error: ErrorBody {
                        code: other.code().to_string(),
                        message: other.user_message(),
                    },
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        // Server-side document validation (code 121) is a client error,
        // reported alongside ordinary validation failures.
        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*err.kind {
            if write_error.code == 121 {
                return AppError::DocumentRejected(FieldErrors::single(
                    "document",
                    write_error.message.clone(),
                ));
            }
        }
        tracing::error!("Document store error: {:?}", err);
        AppError::Internal(err.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(fields: FieldErrors) -> Self {
        AppError::Validation(fields)
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(FieldErrors::single(field, message))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, RuntimeErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Request shape (body, path or query failed to parse or validate)
    #[error("{0}")]
    Validation(String),

    // Business rule violations
    #[error("{0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// How a database failure surfaces to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbFailure {
    /// Unique, foreign-key or exclusion constraint rejected the write
    Integrity,
    /// Concurrent transaction won a serialization race
    Serialization,
    /// No connection could be obtained
    Unavailable,
    Other,
}

// PostgreSQL SQLSTATE codes not covered by `DbErr::sql_err`
const SQLSTATE_EXCLUSION_VIOLATION: &str = "23P01";
const SQLSTATE_SERIALIZATION_FAILURE: &str = "40001";
const SQLSTATE_DEADLOCK_DETECTED: &str = "40P01";

/// Classify a database error by its cause.
pub fn classify_db_error(err: &DbErr) -> DbFailure {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => return DbFailure::Unavailable,
        _ => {}
    }

    if let Some(SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_)) =
        err.sql_err()
    {
        return DbFailure::Integrity;
    }

    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return DbFailure::Other,
    };

    if let RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db)) = runtime {
        match db.code().as_deref() {
            Some(SQLSTATE_EXCLUSION_VIOLATION) => return DbFailure::Integrity,
            Some(SQLSTATE_SERIALIZATION_FAILURE) | Some(SQLSTATE_DEADLOCK_DETECTED) => {
                return DbFailure::Serialization
            }
            _ => {}
        }
    }

    if let RuntimeErr::SqlxError(
        sea_orm::sqlx::Error::PoolTimedOut
        | sea_orm::sqlx::Error::PoolClosed
        | sea_orm::sqlx::Error::Io(_),
    ) = runtime
    {
        return DbFailure::Unavailable;
    }

    DbFailure::Other
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(e) => match classify_db_error(e) {
                DbFailure::Integrity | DbFailure::Serialization => "CONFLICT",
                DbFailure::Unavailable => "SERVICE_UNAVAILABLE",
                DbFailure::Other => "DATABASE_ERROR",
            },
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => match classify_db_error(e) {
                DbFailure::Integrity | DbFailure::Serialization => StatusCode::CONFLICT,
                DbFailure::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                DbFailure::Other => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }

            AppError::Database(e) => match classify_db_error(e) {
                DbFailure::Integrity => {
                    tracing::warn!("Integrity constraint violated: {:?}", e);
                    "Request conflicts with existing data".to_string()
                }
                DbFailure::Serialization => {
                    tracing::warn!("Transaction conflict: {:?}", e);
                    "Request conflicted with a concurrent update, retry it".to_string()
                }
                DbFailure::Unavailable => {
                    tracing::error!("Database unavailable: {:?}", e);
                    "Database is temporarily unavailable".to_string()
                }
                DbFailure::Other => {
                    tracing::error!("Database error: {:?}", e);
                    "A database error occurred".to_string()
                }
            },
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    /// `entity` names the missing resource in the message, e.g. `"Hotel"`.
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_their_status() {
        assert_eq!(AppError::not_found("Hotel").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("taken").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::bad_request("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::validation("missing field").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(AppError::not_found("Room").to_string(), "Room not found");
        let missing: Option<i32> = None;
        assert!(matches!(
            missing.ok_or_not_found("Booking"),
            Err(AppError::NotFound(entity)) if entity == "Booking"
        ));
    }

    #[test]
    fn connection_failures_are_unavailable() {
        let err = DbErr::Conn(RuntimeErr::Internal("refused".into()));
        assert_eq!(classify_db_error(&err), DbFailure::Unavailable);
        assert_eq!(
            AppError::from(err).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn unknown_database_errors_are_internal() {
        let err = DbErr::Custom("boom".into());
        assert_eq!(classify_db_error(&err), DbFailure::Other);
        assert_eq!(
            AppError::from(err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

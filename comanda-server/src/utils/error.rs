//! Unified error handling
//!
//! Provides the application error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error code scheme
//!
//! | Code  | Meaning                    | HTTP |
//! |-------|----------------------------|------|
//! | E0000 | success                    | 2xx  |
//! | E0002 | validation failed          | 400  |
//! | E0003 | resource not found         | 404  |
//! | E0004 | duplicate resource         | 409  |
//! | E0005 | invalid status transition  | 422  |
//! | E0007 | feedback not yet eligible  | 422  |
//! | E2001 | permission denied          | 403  |
//! | E3001 | authentication required    | 401  |
//! | E3002 | invalid token              | 401  |
//! | E3003 | token expired              | 401  |
//! | E9001 | internal error             | 500  |
//! | E9002 | database error             | 500  |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Result alias used across handlers and services
pub type AppResult<T> = Result<T, AppError>;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication Errors ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Duplicate(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn not_eligible(msg: impl Into<String>) -> Self {
        Self::NotEligible(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Uniform message for failed logins, to avoid username enumeration
    pub fn invalid_credentials() -> Self {
        Self::Validation("Invalid username or password".to_string())
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "E3001",
            Self::TokenExpired => "E3003",
            Self::InvalidToken => "E3002",
            Self::Forbidden(_) => "E2001",
            Self::NotFound(_) => "E0003",
            Self::Duplicate(_) => "E0004",
            Self::Validation(_) => "E0002",
            Self::InvalidTransition(_) => "E0005",
            Self::NotEligible(_) => "E0007",
            Self::Database(_) => "E9002",
            Self::Internal(_) => "E9001",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Please login first".to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),

            // Conflict (409)
            AppError::Duplicate(msg) => (StatusCode::CONFLICT, msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            // Business rule violations (422)
            AppError::InvalidTransition(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::NotEligible(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),

            // Database errors (500), internal detail stays in the log
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Duplicate("Record already exists".to_string())
            }
            _ => AppError::Database(e.to_string()),
        }
    }
}

impl From<shared::StatusParseError> for AppError {
    fn from(e: shared::StatusParseError) -> Self {
        AppError::Internal(format!("Corrupt status column: {e}"))
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(AppError::validation("x").code(), "E0002");
        assert_eq!(AppError::not_found("x").code(), "E0003");
        assert_eq!(AppError::duplicate("x").code(), "E0004");
        assert_eq!(AppError::invalid_transition("x").code(), "E0005");
        assert_eq!(AppError::not_eligible("x").code(), "E0007");
        assert_eq!(AppError::Unauthorized.code(), "E3001");
        assert_eq!(AppError::database("x").code(), "E9002");
    }

    #[test]
    fn http_status_mapping() {
        let cases = [
            (AppError::validation("x").into_response(), 400),
            (AppError::not_found("x").into_response(), 404),
            (AppError::duplicate("x").into_response(), 409),
            (AppError::invalid_transition("x").into_response(), 422),
            (AppError::not_eligible("x").into_response(), 422),
            (AppError::Unauthorized.into_response(), 401),
            (AppError::forbidden("x").into_response(), 403),
            (AppError::database("x").into_response(), 500),
        ];
        for (resp, expected) in cases {
            assert_eq!(resp.status().as_u16(), expected);
        }
    }
}

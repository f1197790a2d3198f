//! Unified error handling for the admin panel.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AdminAuthError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Malformed or missing client input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// CSRF token missing or mismatched on a state-changing request.
    #[error("CSRF rejected")]
    CsrfRejected,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AdminAuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                AdminAuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::CsrfRejected => StatusCode::FORBIDDEN,
        }
    }

    /// Client-facing JSON body; internal details never leak here.
    fn body(&self) -> serde_json::Value {
        match self {
            Self::Database(_) | Self::Internal(_) => json!({"error": "Internal server error"}),
            Self::Auth(err) => match err {
                AdminAuthError::InvalidCredentials => {
                    json!({"error": "Invalid username or password"})
                }
                AdminAuthError::RateLimited => {
                    json!({"error": "Too many attempts. Please try again later."})
                }
                AdminAuthError::Repository(_) => json!({"error": "Internal server error"}),
            },
            Self::Validation(msg) => json!({"error": msg}),
            Self::NotFound(_) => json!({"error": "Not found"}),
            Self::Unauthorized(_) => json!({"error": "Not authenticated"}),
            Self::CsrfRejected => json!({"error": "Invalid CSRF token"}),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        (status, Json(self.body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::CsrfRejected),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AdminAuthError::RateLimited)),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Auth(AdminAuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::NotFound("business".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_generic_credential_message() {
        let body = AppError::Auth(AdminAuthError::InvalidCredentials).body();
        assert_eq!(body["error"], "Invalid username or password");
    }
}

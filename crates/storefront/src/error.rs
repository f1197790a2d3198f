//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that maps the whole error taxonomy to
//! HTTP statuses in one place and captures server errors to Sentry before
//! responding. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::gift_cards::RedemptionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Redemption operation failed.
    #[error("Redemption error: {0}")]
    Redemption(#[from] RedemptionError),

    /// Malformed or missing client input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found (also cross-tenant access).
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials { .. }
                | AuthError::PasswordNotSet
                | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::AccountLocked { .. } => StatusCode::LOCKED,
                AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Redemption(err) => match err {
                RedemptionError::InvalidAmount
                | RedemptionError::NotRedeemable
                | RedemptionError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
                RedemptionError::NotFound => StatusCode::NOT_FOUND,
                RedemptionError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Client-facing JSON body; internal details never leak here.
    fn body(&self) -> serde_json::Value {
        match self {
            Self::Database(_) | Self::Internal(_) => json!({"error": "Internal server error"}),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => json!({"error": "Invalid email address"}),
                AuthError::InvalidCredentials { attempts_remaining } => {
                    let mut body = json!({"error": "Invalid email or password"});
                    if let Some(remaining) = attempts_remaining {
                        body["attemptsRemaining"] = json!(remaining);
                        body["warning"] = json!(format!(
                            "{remaining} attempts remaining before your account is locked"
                        ));
                    }
                    body
                }
                AuthError::PasswordNotSet => json!({
                    "error": "No password set for this account. Use the password reset link to set one."
                }),
                AuthError::AccountLocked { minutes_remaining } => json!({
                    "error": format!(
                        "Account locked. Try again in {minutes_remaining} minutes."
                    ),
                    "retryAfterMinutes": minutes_remaining,
                }),
                AuthError::RateLimited => {
                    json!({"error": "Too many attempts. Please try again later."})
                }
                AuthError::WeakPassword(violation) => json!({
                    "error": "Password does not meet requirements",
                    "errors": violation.errors,
                    "suggestions": violation.suggestions,
                }),
                AuthError::InvalidToken => json!({"error": "Invalid or expired token"}),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    json!({"error": "Internal server error"})
                }
            },
            Self::Redemption(err) => match err {
                RedemptionError::InvalidAmount => {
                    json!({"error": "Redemption amount must be a positive number"})
                }
                RedemptionError::NotFound => json!({"error": "Gift card not found"}),
                RedemptionError::NotRedeemable => {
                    json!({"error": "Gift card has no redeemable balance"})
                }
                RedemptionError::InsufficientBalance { remaining } => json!({
                    "error": "Amount exceeds remaining balance",
                    "remainingBalance": remaining,
                }),
                RedemptionError::Repository(_) => json!({"error": "Internal server error"}),
            },
            Self::Validation(msg) => json!({"error": msg}),
            Self::NotFound(_) => json!({"error": "Not found"}),
            Self::Unauthorized(_) => json!({"error": "Not authenticated"}),
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
                "Request error"
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
    fn test_app_error_display() {
        let err = AppError::NotFound("gift-card-123".to_string());
        assert_eq!(err.to_string(), "Not found: gift-card-123");

        let err = AppError::Validation("invalid input".to_string());
        assert_eq!(err.to_string(), "Validation error: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials {
                attempts_remaining: None
            })),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::AccountLocked {
                minutes_remaining: 30
            })),
            StatusCode::LOCKED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::RateLimited)),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordNotSet)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_redemption_error_statuses() {
        use rust_decimal::Decimal;

        assert_eq!(
            get_status(AppError::Redemption(RedemptionError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Redemption(RedemptionError::InvalidAmount)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Redemption(RedemptionError::InsufficientBalance {
                remaining: Decimal::new(2000, 2)
            })),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_locked_body_carries_retry_hint() {
        let err = AppError::Auth(AuthError::AccountLocked {
            minutes_remaining: 12,
        });
        let body = err.body();
        assert_eq!(body["retryAfterMinutes"], 12);
    }

    #[test]
    fn test_invalid_credentials_warning_only_when_low() {
        let quiet = AppError::Auth(AuthError::InvalidCredentials {
            attempts_remaining: None,
        });
        assert!(quiet.body().get("attemptsRemaining").is_none());

        let warned = AppError::Auth(AuthError::InvalidCredentials {
            attempts_remaining: Some(2),
        });
        assert_eq!(warned.body()["attemptsRemaining"], 2);
    }
}

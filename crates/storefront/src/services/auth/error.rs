//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::password::PasswordPolicyViolation;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] gifty_core::EmailError),

    /// Invalid credentials (wrong password, unknown or inactive account).
    ///
    /// Carries the remaining attempts before lockout when the account is
    /// close to locking; `None` otherwise (including for unknown accounts,
    /// which must be indistinguishable from wrong passwords).
    #[error("invalid email or password")]
    InvalidCredentials {
        /// Attempts left before lockout, surfaced only when low.
        attempts_remaining: Option<u32>,
    },

    /// The business exists but no password has been set yet.
    #[error("no password set for this account")]
    PasswordNotSet,

    /// The account is locked out after repeated failures.
    #[error("account locked, try again in {minutes_remaining} minutes")]
    AccountLocked {
        /// Minutes until the lockout expires.
        minutes_remaining: i64,
    },

    /// Attempt budget exhausted; no credential check was performed.
    #[error("too many attempts, slow down")]
    RateLimited,

    /// Password too weak, with structured details.
    #[error("password validation failed")]
    WeakPassword(PasswordPolicyViolation),

    /// Magic-link or reset token is missing, spent, or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

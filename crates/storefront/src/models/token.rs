//! Single-use authentication token types.

use chrono::{DateTime, Utc};

use gifty_core::Email;

/// A single-use magic-link login token.
///
/// Valid for 15 minutes from issuance; consuming it is atomic, so a token
/// never yields more than one session.
#[derive(Debug, Clone)]
pub struct MagicLinkToken {
    /// Opaque URL-safe token value.
    pub token: String,
    /// Email the token is bound to.
    pub email: Email,
    /// Hard expiry; verification fails afterwards even if unused.
    pub expires_at: DateTime<Utc>,
}

/// A single-use password reset token.
///
/// Valid for 1 hour from issuance. The read-only validity check never
/// consumes it; only a successful reset marks it used.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    /// Opaque URL-safe token value.
    pub token: String,
    /// Email the token is bound to.
    pub email: Email,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
}

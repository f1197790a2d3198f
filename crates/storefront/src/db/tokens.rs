//! Single-use token repository.
//!
//! Magic-link and password-reset tokens share the same consumption rule: a
//! token is spent by one conditional `UPDATE … RETURNING`, so two concurrent
//! verifications can never both succeed.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use gifty_core::Email;

use super::RepositoryError;
use crate::models::token::{MagicLinkToken, PasswordResetToken};

/// Magic-link tokens expire 15 minutes after issuance.
const MAGIC_LINK_TTL_MINUTES: i64 = 15;

/// Password-reset tokens expire 1 hour after issuance.
const RESET_TTL_MINUTES: i64 = 60;

#[derive(sqlx::FromRow)]
struct ResetTokenRow {
    email: String,
    expires_at: DateTime<Utc>,
    used: bool,
}

/// Repository for single-use authentication tokens.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Magic link tokens
    // =========================================================================

    /// Persist a new magic-link token bound to `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_magic_link(
        &self,
        token: &str,
        email: &Email,
    ) -> Result<MagicLinkToken, RepositoryError> {
        let expires_at = Utc::now() + Duration::minutes(MAGIC_LINK_TTL_MINUTES);

        sqlx::query(
            r"
            INSERT INTO magic_link_tokens (token, email, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(token)
        .bind(email.as_str())
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(MagicLinkToken {
            token: token.to_owned(),
            email: email.clone(),
            expires_at,
        })
    }

    /// Atomically consume a magic-link token and return the bound email.
    ///
    /// Succeeds at most once per token: the existence, unused, and unexpired
    /// checks and the `used` flip happen in a single conditional update.
    /// Returns `None` for missing, spent, or expired tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn consume_magic_link(
        &self,
        token: &str,
    ) -> Result<Option<Email>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as(
            r"
            UPDATE magic_link_tokens
            SET used = TRUE, used_at = now()
            WHERE token = $1 AND used = FALSE AND expires_at > now()
            RETURNING email
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        row.map(|(email,)| {
            Email::parse(&email).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })
        })
        .transpose()
    }

    // =========================================================================
    // Password reset tokens
    // =========================================================================

    /// Persist a new password-reset token bound to `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_password_reset(
        &self,
        token: &str,
        email: &Email,
    ) -> Result<PasswordResetToken, RepositoryError> {
        let expires_at = Utc::now() + Duration::minutes(RESET_TTL_MINUTES);

        sqlx::query(
            r"
            INSERT INTO password_reset_tokens (token, email, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(token)
        .bind(email.as_str())
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(PasswordResetToken {
            token: token.to_owned(),
            email: email.clone(),
            expires_at,
        })
    }

    /// Read-only validity check for a reset token.
    ///
    /// Never mutates anything; returns the bound email iff the token exists,
    /// is unused, and has not expired.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn peek_password_reset(
        &self,
        token: &str,
    ) -> Result<Option<Email>, RepositoryError> {
        let row = sqlx::query_as::<_, ResetTokenRow>(
            r"
            SELECT email, expires_at, used
            FROM password_reset_tokens
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };
        if row.used || row.expires_at <= Utc::now() {
            return Ok(None);
        }

        Email::parse(&row.email)
            .map(Some)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
    }

    /// Atomically consume a reset token, stamping audit metadata.
    ///
    /// Same single-use contract as [`Self::consume_magic_link`]; additionally
    /// records the requesting IP alongside `used_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn consume_password_reset(
        &self,
        token: &str,
        ip_address: Option<&str>,
    ) -> Result<Option<Email>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as(
            r"
            UPDATE password_reset_tokens
            SET used = TRUE, used_at = now(), ip_address = $2
            WHERE token = $1 AND used = FALSE AND expires_at > now()
            RETURNING email
            ",
        )
        .bind(token)
        .bind(ip_address)
        .fetch_optional(self.pool)
        .await?;

        row.map(|(email,)| {
            Email::parse(&email).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })
        })
        .transpose()
    }
}

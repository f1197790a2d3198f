//! Authentication service.
//!
//! Orchestrates the owner login policy: rate limiting before any credential
//! work, persisted lockout on the credential row, and single-use magic-link
//! and password-reset tokens.

mod error;
pub mod password;

pub use error::AuthError;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;

use gifty_core::{Email, RateLimiter};

use crate::db::businesses::BusinessRepository;
use crate::db::tokens::TokenRepository;
use crate::models::business::Business;
use crate::models::token::{MagicLinkToken, PasswordResetToken};

/// Consecutive failures on a credential before the account locks.
const LOCKOUT_THRESHOLD: i32 = 10;

/// Length of the lockout once the threshold is reached.
const LOCKOUT_MINUTES: i64 = 30;

/// Remaining-attempt warnings start at this many attempts left.
const LOW_ATTEMPTS_WARNING: i32 = 3;

/// Byte length of magic-link and reset token material.
const TOKEN_BYTES: usize = 32;

/// Authentication service for business owners.
///
/// Handles password login with lockout, magic-link issue/verify, and the
/// two-phase password reset.
pub struct AuthService<'a> {
    businesses: BusinessRepository<'a>,
    tokens: TokenRepository<'a>,
    limiter: &'a RateLimiter,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, limiter: &'a RateLimiter) -> Self {
        Self {
            businesses: BusinessRepository::new(pool),
            tokens: TokenRepository::new(pool),
            limiter,
        }
    }

    // =========================================================================
    // Password Login
    // =========================================================================

    /// Login with email and password.
    ///
    /// The attempt budget is checked for both the email and client IP keys
    /// before any database or hash work, so a limited caller learns nothing
    /// about the credential. Unknown and inactive accounts fail exactly like
    /// a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RateLimited` when the budget is exhausted,
    /// `AuthError::AccountLocked` during a lockout window (even with the
    /// correct password), `AuthError::PasswordNotSet` when the business has
    /// no credential yet, and `AuthError::InvalidCredentials` otherwise.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
        client_ip: Option<&str>,
    ) -> Result<Business, AuthError> {
        let email = Email::parse(email)?;
        let email_key = login_email_key(&email);
        let ip_key = client_ip.map(login_ip_key);

        if self.limiter.is_limited(&email_key)
            || ip_key.as_deref().is_some_and(|k| self.limiter.is_limited(k))
        {
            return Err(AuthError::RateLimited);
        }

        // Unknown and inactive accounts burn budget like wrong passwords
        let business = match self.businesses.get_by_email(&email).await? {
            Some(business) if business.active => business,
            _ => {
                self.note_failed_attempt(&email_key, ip_key.as_deref());
                return Err(AuthError::InvalidCredentials {
                    attempts_remaining: None,
                });
            }
        };

        let credential = self
            .businesses
            .get_credential(business.id)
            .await?
            .ok_or(AuthError::PasswordNotSet)?;

        if let Some(minutes_remaining) = credential.locked_minutes_remaining(Utc::now()) {
            return Err(AuthError::AccountLocked { minutes_remaining });
        }

        if !password::verify_password(password, &credential.password_hash) {
            self.note_failed_attempt(&email_key, ip_key.as_deref());

            let failures = self.businesses.record_failed_attempt(business.id).await?;
            if failures >= LOCKOUT_THRESHOLD {
                let until = Utc::now() + Duration::minutes(LOCKOUT_MINUTES);
                self.businesses.lock_account(business.id, until).await?;
                tracing::warn!(business_id = %business.id, "account locked after repeated failures");
                return Err(AuthError::AccountLocked {
                    minutes_remaining: LOCKOUT_MINUTES,
                });
            }

            let remaining = LOCKOUT_THRESHOLD - failures;
            let attempts_remaining =
                (remaining <= LOW_ATTEMPTS_WARNING).then(|| remaining.unsigned_abs());
            return Err(AuthError::InvalidCredentials { attempts_remaining });
        }

        // Success clears both the persisted counter and the window budgets
        self.businesses.clear_failed_attempts(business.id).await?;
        self.limiter.reset(&email_key);
        if let Some(key) = &ip_key {
            self.limiter.reset(key);
        }

        Ok(business)
    }

    // =========================================================================
    // Magic Links
    // =========================================================================

    /// Issue a magic-link token for `email`.
    ///
    /// Returns `None` when no active business matches; the caller must
    /// respond identically in both cases and simply skip dispatch.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for malformed input and
    /// `AuthError::Repository` if persistence fails.
    pub async fn request_magic_link(
        &self,
        email: &str,
    ) -> Result<Option<MagicLinkToken>, AuthError> {
        let email = Email::parse(email)?;

        match self.businesses.get_by_email(&email).await? {
            Some(business) if business.active => {
                let token = self
                    .tokens
                    .create_magic_link(&generate_token(), &email)
                    .await?;
                Ok(Some(token))
            }
            _ => Ok(None),
        }
    }

    /// Exchange a magic-link token for the business it logs in to.
    ///
    /// Consumption is atomic and exactly-once; a second call with the same
    /// token returns `None` even inside the expiry window. Never errors
    /// across this boundary - internal failures are logged and read as an
    /// invalid token.
    pub async fn verify_magic_link(&self, token: &str) -> Option<Business> {
        let email = match self.tokens.consume_magic_link(token).await {
            Ok(Some(email)) => email,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "magic link consumption failed");
                return None;
            }
        };

        match self.businesses.get_by_email(&email).await {
            Ok(Some(business)) if business.active => Some(business),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "business lookup failed during magic link verify");
                None
            }
        }
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Issue a password-reset token for `email`.
    ///
    /// Same anti-enumeration contract as [`Self::request_magic_link`]:
    /// unknown or inactive emails silently yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for malformed input and
    /// `AuthError::Repository` if persistence fails.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<PasswordResetToken>, AuthError> {
        let email = Email::parse(email)?;

        match self.businesses.get_by_email(&email).await? {
            Some(business) if business.active => {
                let token = self
                    .tokens
                    .create_password_reset(&generate_token(), &email)
                    .await?;
                Ok(Some(token))
            }
            _ => Ok(None),
        }
    }

    /// Side-effect-free validity check for a reset token.
    ///
    /// Lets the client pre-validate before rendering the reset form; never
    /// marks anything used.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn check_reset_token(&self, token: &str) -> Result<Option<Email>, AuthError> {
        let Some(email) = self.tokens.peek_password_reset(token).await? else {
            return Ok(None);
        };

        // The bound account must still be active
        match self.businesses.get_by_email(&email).await? {
            Some(business) if business.active => Ok(Some(email)),
            _ => Ok(None),
        }
    }

    /// Complete a password reset: rotate the credential and consume the token.
    ///
    /// Strength is validated before the token is spent, so a weak password
    /// does not burn the link. The upsert resets the failure counter and any
    /// lockout.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` with structured details,
    /// `AuthError::InvalidToken` for missing/spent/expired tokens or
    /// inactive accounts, and `AuthError::Repository` on database failure.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        client_ip: Option<&str>,
    ) -> Result<Business, AuthError> {
        password::validate_password_strength(new_password).map_err(AuthError::WeakPassword)?;

        let password_hash = password::hash_password(new_password)?;

        let email = self
            .tokens
            .consume_password_reset(token, client_ip)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let business = match self.businesses.get_by_email(&email).await? {
            Some(business) if business.active => business,
            _ => return Err(AuthError::InvalidToken),
        };

        self.businesses
            .upsert_credential(business.id, &email, &password_hash)
            .await?;

        Ok(business)
    }

    fn note_failed_attempt(&self, email_key: &str, ip_key: Option<&str>) {
        self.limiter.record_attempt(email_key);
        if let Some(key) = ip_key {
            self.limiter.record_attempt(key);
        }
    }
}

/// Limiter key for an owner login email.
#[must_use]
pub fn login_email_key(email: &Email) -> String {
    format!("login:email:{email}")
}

/// Limiter key for an owner login client IP.
#[must_use]
pub fn login_ip_key(ip: &str) -> String {
    format!("login:ip:{ip}")
}

/// Generate an unguessable URL-safe token.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_urlsafe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 32 bytes of base64url without padding
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_limiter_keys_are_namespaced() {
        let email = Email::parse("owner@example.com").unwrap();
        assert_eq!(login_email_key(&email), "login:email:owner@example.com");
        assert_eq!(login_ip_key("203.0.113.9"), "login:ip:203.0.113.9");
    }
}

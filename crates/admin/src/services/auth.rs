//! Admin authentication service.
//!
//! Admin logins carry a much tighter attempt budget than owner logins
//! (3 per 15 minutes, keyed by username and IP under the `admin:`
//! namespace) and every outcome is written to the audit log. There is no
//! persisted lockout counter on admin accounts; the keyed limiter is the
//! whole policy.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;

use gifty_core::RateLimiter;

use crate::db::RepositoryError;
use crate::db::admin_users::AdminUserRepository;
use crate::db::audit::AuditRepository;
use crate::models::admin_user::AdminUser;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Wrong username or password (generic on purpose).
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Attempt budget exhausted; no credential check was performed.
    #[error("too many attempts, slow down")]
    RateLimited,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authentication service for platform admins.
pub struct AdminAuthService<'a> {
    admins: AdminUserRepository<'a>,
    audit: AuditRepository<'a>,
    limiter: &'a RateLimiter,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, limiter: &'a RateLimiter) -> Self {
        Self {
            admins: AdminUserRepository::new(pool),
            audit: AuditRepository::new(pool),
            limiter,
        }
    }

    /// Login with username and password.
    ///
    /// The budget check runs before any database or hash work; a limited
    /// caller learns nothing about the credential.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::RateLimited` when the budget is exhausted
    /// and `AdminAuthError::InvalidCredentials` for unknown, inactive, or
    /// wrong-password logins.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client_ip: Option<&str>,
    ) -> Result<AdminUser, AdminAuthError> {
        let username = username.trim();
        let user_key = admin_user_key(username);
        let ip_key = client_ip.map(admin_ip_key);

        if self.limiter.is_limited(&user_key)
            || ip_key.as_deref().is_some_and(|k| self.limiter.is_limited(k))
        {
            return Err(AdminAuthError::RateLimited);
        }

        let found = self.admins.get_by_username(username).await?;

        let verified = match &found {
            Some((admin, password_hash)) if admin.active => {
                verify_password(password, password_hash)
            }
            _ => false,
        };

        if !verified {
            self.limiter.record_attempt(&user_key);
            if let Some(key) = &ip_key {
                self.limiter.record_attempt(key);
            }
            self.audit
                .record_best_effort(
                    username,
                    "admin.login.failed",
                    json!({"username": username}),
                    client_ip,
                )
                .await;
            return Err(AdminAuthError::InvalidCredentials);
        }

        // `verified` implies the row exists and is active
        let Some((admin, _)) = found else {
            return Err(AdminAuthError::InvalidCredentials);
        };

        self.limiter.reset(&user_key);
        if let Some(key) = &ip_key {
            self.limiter.reset(key);
        }

        self.audit
            .record_best_effort(
                &admin.username,
                "admin.login.success",
                json!({"adminUserId": admin.id}),
                client_ip,
            )
            .await;

        Ok(admin)
    }
}

/// Limiter key for an admin username.
#[must_use]
pub fn admin_user_key(username: &str) -> String {
    format!("admin:user:{username}")
}

/// Limiter key for an admin login client IP.
#[must_use]
pub fn admin_ip_key(ip: &str) -> String {
    format!("admin:ip:{ip}")
}

/// Verify a password against a stored hash.
///
/// An unparseable stored hash verifies as false rather than erroring.
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_keys_use_admin_namespace() {
        assert_eq!(admin_user_key("root"), "admin:user:root");
        assert_eq!(admin_ip_key("203.0.113.9"), "admin:ip:203.0.113.9");
    }

    #[test]
    fn test_verify_garbage_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-hash"));
    }
}

//! Business domain types.

use chrono::{DateTime, Utc};

use gifty_core::{BusinessId, Email};

/// A business enrolled on the platform (domain type).
///
/// The contact email doubles as the owner's login identity.
#[derive(Debug, Clone)]
pub struct Business {
    /// Unique business ID.
    pub id: BusinessId,
    /// Display name shown on receipts and the dashboard.
    pub name: String,
    /// Owner contact email (login key, stored normalized).
    pub contact_email: Email,
    /// Whether the business can log in and redeem.
    pub active: bool,
    /// When the business was enrolled.
    pub created_at: DateTime<Utc>,
}

/// Login credential attached to a business (domain type).
///
/// Absent until the owner sets a first password via reset.
#[derive(Debug, Clone)]
pub struct BusinessCredential {
    /// Business this credential belongs to.
    pub business_id: BusinessId,
    /// Login email (mirrors the business contact email).
    pub email: Email,
    /// Argon2id PHC-format hash.
    pub password_hash: String,
    /// Consecutive failed login attempts since the last success.
    pub failed_login_attempts: i32,
    /// Lockout expiry; login is refused while this is in the future.
    pub account_locked_until: Option<DateTime<Utc>>,
    /// When the password was last set.
    pub password_changed_at: DateTime<Utc>,
}

impl BusinessCredential {
    /// Minutes until an active lockout expires, if one is in force.
    #[must_use]
    pub fn locked_minutes_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.account_locked_until.and_then(|until| {
            let remaining = until - now;
            if remaining > chrono::Duration::zero() {
                // Round up so "29m30s left" reads as 30 minutes
                Some((remaining.num_seconds() + 59) / 60)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn credential(locked_until: Option<DateTime<Utc>>) -> BusinessCredential {
        BusinessCredential {
            business_id: BusinessId::new(1),
            email: Email::parse("owner@example.com").unwrap(),
            password_hash: "$argon2id$stub".to_string(),
            failed_login_attempts: 0,
            account_locked_until: locked_until,
            password_changed_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_lockout() {
        let cred = credential(None);
        assert_eq!(cred.locked_minutes_remaining(Utc::now()), None);
    }

    #[test]
    fn test_expired_lockout() {
        let now = Utc::now();
        let cred = credential(Some(now - chrono::Duration::minutes(5)));
        assert_eq!(cred.locked_minutes_remaining(now), None);
    }

    #[test]
    fn test_active_lockout_rounds_up() {
        let now = Utc::now();
        let cred = credential(Some(now + chrono::Duration::seconds(29 * 60 + 30)));
        assert_eq!(cred.locked_minutes_remaining(now), Some(30));
    }
}

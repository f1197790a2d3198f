//! Admin user domain types.

use chrono::{DateTime, Utc};

use gifty_core::AdminUserId;

/// A platform administrator (domain type).
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login username.
    pub username: String,
    /// Name shown in the UI and audit log.
    pub display_name: String,
    /// Whether this admin can log in.
    pub active: bool,
    /// When the admin account was created.
    pub created_at: DateTime<Utc>,
}

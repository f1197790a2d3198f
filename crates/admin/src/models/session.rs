//! Session-related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gifty_core::AdminUserId;

/// Session-stored admin identity.
///
/// Carries the per-session CSRF token that state-changing requests must echo
/// in the `x-csrf-token` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Login username (audit log actor).
    pub username: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Expected CSRF token for this session.
    pub csrf_token: String,
    /// When this session was established.
    pub logged_in_at: DateTime<Utc>,
    /// Client IP observed at login.
    pub ip_address: Option<String>,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

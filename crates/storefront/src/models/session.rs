//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gifty_core::{BusinessId, Email};

/// Session-stored owner identity.
///
/// Minimal data stored in the session to identify the logged-in business
/// owner, plus client metadata captured at login for auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOwner {
    /// Business the owner is logged in to.
    pub business_id: BusinessId,
    /// Owner's email address.
    pub email: Email,
    /// Business display name.
    pub business_name: String,
    /// When this session was established.
    pub logged_in_at: DateTime<Utc>,
    /// Client IP observed at login.
    pub ip_address: Option<String>,
    /// Client user agent observed at login.
    pub user_agent: Option<String>,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in business owner.
    pub const CURRENT_OWNER: &str = "current_owner";
}

//! HTTP middleware stack for the admin panel.

pub mod auth;
pub mod csrf;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use csrf::{CSRF_HEADER, generate_csrf_token, require_csrf, tokens_match};
pub use session::create_session_layer;

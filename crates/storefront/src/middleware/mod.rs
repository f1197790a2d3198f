//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Rate limiting (governor, auth routes only)

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalOwner, RequireOwner, clear_current_owner, set_current_owner};
pub use rate_limit::{auth_rate_limiter, client_ip};
pub use session::create_session_layer;

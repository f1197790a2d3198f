//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness check
//! GET    /health/ready                  - Readiness check (DB ping)
//!
//! # Auth (JSON)
//! POST   /api/admin/login               - Admin login (3 attempts / 15 min)
//! POST   /api/admin/logout              - Logout, cookie cleared
//!
//! # Tenants (requires session + CSRF header)
//! DELETE /api/admin/businesses/{id}     - Delete a business (cascades)
//! ```

pub mod auth;
pub mod businesses;

use axum::{
    Router,
    routing::{delete, post},
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/logout", post(auth::logout))
        .route(
            "/api/admin/businesses/{id}",
            delete(businesses::delete_business),
        )
}

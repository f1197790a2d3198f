//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (DB ping)
//!
//! # Auth (JSON, per-IP rate limited)
//! POST /api/auth/login                      - Password login
//! POST /api/auth/logout                     - Logout (idempotent)
//! POST /api/auth/request-magic-link         - Issue magic link (always 200)
//! GET  /api/auth/verify?token=              - Exchange magic link, redirect
//! POST /api/auth/request-password-reset     - Issue reset token (always 200)
//! GET  /api/auth/reset-password/verify      - Read-only token validity check
//! POST /api/auth/reset-password/verify      - Rotate password, auto-login
//!
//! # Owner (requires session)
//! POST /api/owner/gift-cards/redeem         - Redeem against a card balance
//! ```

pub mod auth;
pub mod gift_cards;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/request-magic-link", post(auth::request_magic_link))
        .route("/verify", get(auth::verify_magic_link))
        .route("/request-password-reset", post(auth::request_password_reset))
        .route(
            "/reset-password/verify",
            get(auth::check_reset_token).post(auth::reset_password),
        )
}

/// Create the owner API router.
pub fn owner_routes() -> Router<AppState> {
    Router::new().route("/gift-cards/redeem", post(gift_cards::redeem))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes().layer(auth_rate_limiter()))
        .nest("/api/owner", owner_routes())
}

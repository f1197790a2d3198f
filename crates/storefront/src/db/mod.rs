//! Database operations for the storefront.
//!
//! ## Tables
//!
//! - `businesses` - Enrolled businesses (owner identity)
//! - `business_credentials` - Password hashes and lockout counters
//! - `customers` - Gift card recipients
//! - `gift_cards` / `gift_card_redemptions` - Balances and the redemption log
//! - `magic_link_tokens` / `password_reset_tokens` - Single-use auth tokens
//! - `tower_sessions.session` - Session store (managed by tower-sessions)
//!
//! # Migrations
//!
//! Migrations live in the workspace `migrations/` directory and are embedded
//! into both binaries via `sqlx::migrate!`; each binary applies them on
//! startup.

pub mod businesses;
pub mod gift_cards;
pub mod tokens;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use businesses::BusinessRepository;
pub use gift_cards::GiftCardRepository;
pub use tokens::TokenRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

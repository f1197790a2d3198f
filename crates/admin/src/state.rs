//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use gifty_core::{RateLimitPolicy, RateLimiter};

use crate::config::AdminConfig;

/// Admin login budget: 3 attempts per identifier per 15 minutes.
///
/// Deliberately tighter than the owner budget; see the auth service.
const ADMIN_LOGIN_RATE_POLICY: RateLimitPolicy =
    RateLimitPolicy::new(3, Duration::from_secs(15 * 60));

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    login_limiter: RateLimiter,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let login_limiter = RateLimiter::new(ADMIN_LOGIN_RATE_POLICY);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                login_limiter,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the keyed login attempt limiter.
    #[must_use]
    pub fn login_limiter(&self) -> &RateLimiter {
        &self.inner.login_limiter
    }
}

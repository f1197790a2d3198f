//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use gifty_core::{RateLimitPolicy, RateLimiter};

use crate::config::StorefrontConfig;
use crate::services::mailer::Mailer;

/// Owner login budget: 10 attempts per identifier per 15 minutes.
///
/// Independent of the persisted 10-failure/30-minute credential lockout.
const OWNER_LOGIN_RATE_POLICY: RateLimitPolicy =
    RateLimitPolicy::new(10, Duration::from_secs(15 * 60));

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    mailer: Mailer,
    login_limiter: RateLimiter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The mailer and limiter are constructed once here and handed out by
    /// reference; nothing is lazily initialized per request.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let mailer = Mailer::new(config.mail.clone(), config.is_production());
        let login_limiter = RateLimiter::new(OWNER_LOGIN_RATE_POLICY);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                login_limiter,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the transactional mailer.
    #[must_use]
    pub fn mailer(&self) -> &Mailer {
        &self.inner.mailer
    }

    /// Get a reference to the keyed login attempt limiter.
    #[must_use]
    pub fn login_limiter(&self) -> &RateLimiter {
        &self.inner.login_limiter
    }
}

//! Keyed sliding-window attempt limiter.
//!
//! Gates login attempts independently of the persisted per-account lockout.
//! Counters live in process memory with TTL eviction, so they reset on
//! restart and are not shared across instances. The limiter is constructed
//! once and injected through application state, which keeps the door open for
//! a distributed counter store later without touching call sites.
//!
//! Keys are caller-namespaced strings, e.g. `login:email:owner@example.com`,
//! `login:ip:203.0.113.9`, or `admin:user:root`.

use std::time::{Duration, Instant};

use moka::sync::Cache;

/// Upper bound on distinct keys held at once; beyond this, moka evicts.
const MAX_TRACKED_KEYS: u64 = 100_000;

/// Attempt budget for a limiter: at most `max_attempts` within `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Attempts allowed inside one window.
    pub max_attempts: u32,
    /// Length of the counting window.
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Create a policy of `max_attempts` per `window`.
    #[must_use]
    pub const fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
        }
    }
}

#[derive(Debug, Clone)]
struct AttemptWindow {
    count: u32,
    started_at: Instant,
}

/// In-memory sliding attempt counter keyed by identifier.
///
/// Cheap to clone; clones share the same counters.
#[derive(Clone)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    attempts: Cache<String, AttemptWindow>,
}

impl RateLimiter {
    /// Create a limiter enforcing `policy`.
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        let attempts = Cache::builder()
            .max_capacity(MAX_TRACKED_KEYS)
            .time_to_live(policy.window)
            .build();

        Self { policy, attempts }
    }

    /// The policy this limiter enforces.
    #[must_use]
    pub const fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Whether `key` has exhausted its budget for the current window.
    #[must_use]
    pub fn is_limited(&self, key: &str) -> bool {
        self.current_count(key) >= self.policy.max_attempts
    }

    /// Record one attempt against `key` and return the count in the window.
    pub fn record_attempt(&self, key: &str) -> u32 {
        let now = Instant::now();
        let next = match self.attempts.get(key) {
            Some(existing) if now.duration_since(existing.started_at) < self.policy.window => {
                AttemptWindow {
                    count: existing.count.saturating_add(1),
                    started_at: existing.started_at,
                }
            }
            // Missing or stale entry starts a fresh window
            _ => AttemptWindow {
                count: 1,
                started_at: now,
            },
        };
        let count = next.count;
        self.attempts.insert(key.to_owned(), next);
        count
    }

    /// Attempts left before `key` is limited.
    #[must_use]
    pub fn remaining(&self, key: &str) -> u32 {
        self.policy.max_attempts.saturating_sub(self.current_count(key))
    }

    /// Clear the counter for `key` (successful authentication).
    pub fn reset(&self, key: &str) {
        self.attempts.invalidate(key);
    }

    fn current_count(&self, key: &str) -> u32 {
        match self.attempts.get(key) {
            Some(entry) if entry.started_at.elapsed() < self.policy.window => entry.count,
            _ => 0,
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, window_ms: u64) -> RateLimiter {
        RateLimiter::new(RateLimitPolicy::new(max, Duration::from_millis(window_ms)))
    }

    #[test]
    fn test_under_budget_is_not_limited() {
        let limiter = limiter(3, 60_000);
        assert!(!limiter.is_limited("login:email:a@b.c"));
        limiter.record_attempt("login:email:a@b.c");
        limiter.record_attempt("login:email:a@b.c");
        assert!(!limiter.is_limited("login:email:a@b.c"));
        assert_eq!(limiter.remaining("login:email:a@b.c"), 1);
    }

    #[test]
    fn test_budget_exhaustion_limits() {
        let limiter = limiter(3, 60_000);
        for _ in 0..3 {
            limiter.record_attempt("login:ip:203.0.113.9");
        }
        assert!(limiter.is_limited("login:ip:203.0.113.9"));
        assert_eq!(limiter.remaining("login:ip:203.0.113.9"), 0);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(3, 60_000);
        for _ in 0..3 {
            limiter.record_attempt("admin:user:root");
        }
        assert!(limiter.is_limited("admin:user:root"));
        assert!(!limiter.is_limited("login:email:root"));
    }

    #[test]
    fn test_reset_clears_counter() {
        let limiter = limiter(2, 60_000);
        limiter.record_attempt("login:email:a@b.c");
        limiter.record_attempt("login:email:a@b.c");
        assert!(limiter.is_limited("login:email:a@b.c"));
        limiter.reset("login:email:a@b.c");
        assert!(!limiter.is_limited("login:email:a@b.c"));
    }

    #[test]
    fn test_window_expiry_starts_fresh() {
        let limiter = limiter(2, 30);
        limiter.record_attempt("login:email:a@b.c");
        limiter.record_attempt("login:email:a@b.c");
        assert!(limiter.is_limited("login:email:a@b.c"));

        std::thread::sleep(Duration::from_millis(50));

        assert!(!limiter.is_limited("login:email:a@b.c"));
        assert_eq!(limiter.record_attempt("login:email:a@b.c"), 1);
    }
}

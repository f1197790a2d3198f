//! Integration tests for login attempt budgets.
//!
//! The admin budget (3 per 15 minutes) and the owner budget (10 per 15
//! minutes) are independent policies over the same keyed limiter, separated
//! by key namespace.

use std::time::Duration;

use gifty_core::{RateLimitPolicy, RateLimiter};
use gifty_admin::services::auth::{admin_ip_key, admin_user_key};
use gifty_storefront::services::auth::{login_email_key, login_ip_key};

fn admin_limiter() -> RateLimiter {
    RateLimiter::new(RateLimitPolicy::new(3, Duration::from_secs(15 * 60)))
}

fn owner_limiter() -> RateLimiter {
    RateLimiter::new(RateLimitPolicy::new(10, Duration::from_secs(15 * 60)))
}

#[test]
fn test_admin_fourth_attempt_is_limited() {
    // 3 wrong passwords, then the 4th attempt must short-circuit before any
    // credential check happens.
    let limiter = admin_limiter();
    let key = admin_user_key("root");

    for _ in 0..3 {
        assert!(!limiter.is_limited(&key), "budget holds during failures");
        limiter.record_attempt(&key);
    }

    assert!(limiter.is_limited(&key));
}

#[test]
fn test_owner_budget_is_more_permissive() {
    let limiter = owner_limiter();
    let email = gifty_core::Email::parse("owner@example.com").expect("valid email");
    let key = login_email_key(&email);

    for _ in 0..9 {
        limiter.record_attempt(&key);
    }
    assert!(!limiter.is_limited(&key));

    limiter.record_attempt(&key);
    assert!(limiter.is_limited(&key));
}

#[test]
fn test_namespaces_keep_budgets_apart() {
    // The same identifier in different namespaces must not share a budget.
    let limiter = admin_limiter();

    for _ in 0..3 {
        limiter.record_attempt(&admin_user_key("alice"));
    }

    assert!(limiter.is_limited(&admin_user_key("alice")));
    assert!(!limiter.is_limited(&admin_ip_key("alice")));
}

#[test]
fn test_success_resets_both_keys() {
    let limiter = owner_limiter();
    let email = gifty_core::Email::parse("owner@example.com").expect("valid email");
    let email_key = login_email_key(&email);
    let ip_key = login_ip_key("203.0.113.9");

    for _ in 0..10 {
        limiter.record_attempt(&email_key);
        limiter.record_attempt(&ip_key);
    }
    assert!(limiter.is_limited(&email_key));
    assert!(limiter.is_limited(&ip_key));

    limiter.reset(&email_key);
    limiter.reset(&ip_key);

    assert!(!limiter.is_limited(&email_key));
    assert!(!limiter.is_limited(&ip_key));
}

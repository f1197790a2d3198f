//! Integration tests for Gifty.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gifty-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `redemption_rules` - Balance/status state machine invariants
//! - `password_policy` - Strength validation and hashing
//! - `rate_limit_budgets` - Keyed attempt budgets and namespacing
//! - `admin_csrf` - Session-bound CSRF token verification
//!
//! These tests exercise the library surfaces of the storefront and admin
//! crates directly; database-backed flows additionally need a running
//! `PostgreSQL` and are covered by the repositories' conditional SQL (single
//! statement guards) rather than duplicated here.

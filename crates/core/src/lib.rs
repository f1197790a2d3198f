//! Gifty Core - Shared types library.
//!
//! This crate provides common types used across all Gifty components:
//! - `storefront` - Business-owner facing API (auth, redemption)
//! - `admin` - Internal platform administration API
//!
//! # Architecture
//!
//! The core crate contains only types and small in-process components - no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`ratelimit`] - Keyed sliding-window attempt limiter with TTL eviction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ratelimit;
pub mod types;

pub use ratelimit::{RateLimitPolicy, RateLimiter};
pub use types::*;

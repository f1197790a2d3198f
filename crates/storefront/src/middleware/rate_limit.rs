//! Rate limiting middleware using governor and `tower_governor`.
//!
//! This is the per-IP transport-level budget on auth endpoints. The keyed
//! per-email/per-IP login budget lives in `gifty_core::RateLimiter` and is
//! enforced inside the auth service, before any credential check.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP extraction
// =============================================================================

/// Proxy headers checked for the real client IP, in order.
const IP_HEADERS: &[&str] = &["cf-connecting-ip", "x-forwarded-for", "x-real-ip", "fly-client-ip"];

/// Extract the client IP from proxy headers.
///
/// Returns `None` when no header carries a parseable address (e.g. a direct
/// connection in local development).
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    for header in IP_HEADERS {
        if let Some(ip) = headers
            .get(*header)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Some(ip);
        }
    }
    None
}

/// Key extractor feeding [`client_ip`] into the governor layer.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        client_ip(req.headers()).ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6) // Replenish 1 token every 6 seconds (~10/minute)
        .burst_size(5) // Allow burst of 5 requests
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_client_ip_from_forwarded_chain() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(
            client_ip(&headers).map(|ip| ip.to_string()),
            Some("203.0.113.9".to_string())
        );
    }

    #[test]
    fn test_client_ip_prefers_cf_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.7"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        assert_eq!(
            client_ip(&headers).map(|ip| ip.to_string()),
            Some("198.51.100.7".to_string())
        );
    }

    #[test]
    fn test_client_ip_missing() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}

//! CSRF protection for state-changing admin requests.
//!
//! A random token is bound to the session at login and returned to the
//! client; every mutation must echo it in the `x-csrf-token` header. The
//! comparison is constant-time.

use axum::http::HeaderMap;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::error::AppError;
use crate::models::CurrentAdmin;

/// Header carrying the CSRF token on mutations.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Byte length of CSRF token material.
const CSRF_TOKEN_BYTES: usize = 32;

/// Generate a fresh session-bound CSRF token.
#[must_use]
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Constant-time token comparison.
///
/// Length mismatch returns early (length is not secret); byte comparison
/// never short-circuits.
#[must_use]
pub fn tokens_match(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();

    if expected.len() != provided.len() {
        return false;
    }

    expected
        .iter()
        .zip(provided)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Require a valid CSRF header for the given admin session.
///
/// # Errors
///
/// Returns `AppError::CsrfRejected` when the header is missing or does not
/// match the session-bound token.
pub fn require_csrf(headers: &HeaderMap, admin: &CurrentAdmin) -> Result<(), AppError> {
    let provided = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::CsrfRejected)?;

    if tokens_match(&admin.csrf_token, provided) {
        Ok(())
    } else {
        Err(AppError::CsrfRejected)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;
    use gifty_core::AdminUserId;

    use super::*;

    fn admin_with_token(token: &str) -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::new(1),
            username: "root".to_string(),
            display_name: "Root".to_string(),
            csrf_token: token.to_string(),
            logged_in_at: Utc::now(),
            ip_address: None,
        }
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        assert_ne!(generate_csrf_token(), generate_csrf_token());
    }

    #[test]
    fn test_tokens_match() {
        let token = generate_csrf_token();
        assert!(tokens_match(&token, &token));
        assert!(!tokens_match(&token, &generate_csrf_token()));
        assert!(!tokens_match(&token, ""));
        assert!(!tokens_match(&token, &token[1..]));
    }

    #[test]
    fn test_require_csrf_missing_header() {
        let admin = admin_with_token("expected-token");
        let result = require_csrf(&HeaderMap::new(), &admin);
        assert!(matches!(result, Err(AppError::CsrfRejected)));
    }

    #[test]
    fn test_require_csrf_mismatch() {
        let admin = admin_with_token("expected-token");
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER, HeaderValue::from_static("wrong-token"));
        assert!(matches!(
            require_csrf(&headers, &admin),
            Err(AppError::CsrfRejected)
        ));
    }

    #[test]
    fn test_require_csrf_match() {
        let admin = admin_with_token("expected-token");
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER, HeaderValue::from_static("expected-token"));
        assert!(require_csrf(&headers, &admin).is_ok());
    }
}

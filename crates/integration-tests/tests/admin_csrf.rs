//! Integration tests for admin CSRF token verification.

use axum::http::{HeaderMap, HeaderValue};
use chrono::Utc;

use gifty_admin::middleware::{CSRF_HEADER, generate_csrf_token, require_csrf, tokens_match};
use gifty_admin::models::CurrentAdmin;
use gifty_core::AdminUserId;

fn admin_session() -> CurrentAdmin {
    CurrentAdmin {
        id: AdminUserId::new(1),
        username: "root".to_string(),
        display_name: "Root".to_string(),
        csrf_token: generate_csrf_token(),
        logged_in_at: Utc::now(),
        ip_address: Some("203.0.113.9".to_string()),
    }
}

#[test]
fn test_header_matching_session_token_passes() {
    let admin = admin_session();
    let mut headers = HeaderMap::new();
    headers.insert(
        CSRF_HEADER,
        HeaderValue::from_str(&admin.csrf_token).expect("token is header-safe"),
    );

    assert!(require_csrf(&headers, &admin).is_ok());
}

#[test]
fn test_missing_header_is_rejected() {
    let admin = admin_session();
    assert!(require_csrf(&HeaderMap::new(), &admin).is_err());
}

#[test]
fn test_foreign_token_is_rejected() {
    let admin = admin_session();
    let mut headers = HeaderMap::new();
    headers.insert(
        CSRF_HEADER,
        HeaderValue::from_str(&generate_csrf_token()).expect("token is header-safe"),
    );

    assert!(require_csrf(&headers, &admin).is_err());
}

#[test]
fn test_tokens_match_requires_full_equality() {
    let token = generate_csrf_token();
    assert!(tokens_match(&token, &token));
    assert!(!tokens_match(&token, &token[..token.len() - 1]));
    assert!(!tokens_match(&token, ""));
}

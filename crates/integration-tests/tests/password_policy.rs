//! Integration tests for the password strength policy and hashing.

use gifty_storefront::services::auth::password::{
    MIN_PASSWORD_LENGTH, hash_password, validate_password_strength, verify_password,
};

#[test]
fn test_acceptable_password_passes() {
    assert!(validate_password_strength("sturdy horse 42").is_ok());
}

#[test]
fn test_short_password_reports_length_rule() {
    let violation = validate_password_strength("ab1").expect_err("should fail");
    assert!(
        violation
            .errors
            .iter()
            .any(|e| e.contains(&MIN_PASSWORD_LENGTH.to_string()))
    );
}

#[test]
fn test_every_failed_rule_has_a_suggestion() {
    let violation = validate_password_strength("###").expect_err("should fail");
    assert_eq!(violation.errors.len(), violation.suggestions.len());
    assert!(violation.errors.len() >= 2);
}

#[test]
fn test_violation_serializes_structured() {
    let violation = validate_password_strength("short").expect_err("should fail");
    let json = serde_json::to_value(&violation).expect("serialize");
    assert!(json["errors"].is_array());
    assert!(json["suggestions"].is_array());
}

#[test]
fn test_hash_verify_roundtrip() {
    let hash = hash_password("sturdy horse 42").expect("hashing succeeds");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("sturdy horse 42", &hash));
    assert!(!verify_password("sturdy horse 43", &hash));
}

#[test]
fn test_hashes_are_salted() {
    let a = hash_password("sturdy horse 42").expect("hashing succeeds");
    let b = hash_password("sturdy horse 42").expect("hashing succeeds");
    assert_ne!(a, b);
}

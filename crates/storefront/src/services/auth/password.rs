//! Password hashing and strength policy.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Serialize;

use super::AuthError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Structured report of why a password was rejected.
///
/// Returned to the client on reset so the form can show every failed rule
/// with a matching suggestion, rather than one opaque message.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordPolicyViolation {
    /// Rules the password failed.
    pub errors: Vec<String>,
    /// One suggestion per failed rule.
    pub suggestions: Vec<String>,
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns a [`PasswordPolicyViolation`] listing every failed rule.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordPolicyViolation> {
    let mut errors = Vec::new();
    let mut suggestions = Vec::new();

    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
        suggestions.push("Use a longer passphrase".to_string());
    }

    if !password.chars().any(char::is_alphabetic) {
        errors.push("password must contain at least one letter".to_string());
        suggestions.push("Add a letter".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("password must contain at least one number".to_string());
        suggestions.push("Add a number".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PasswordPolicyViolation {
            errors,
            suggestions,
        })
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// An unparseable stored hash verifies as false rather than erroring, so a
/// corrupted row reads as a failed login instead of a 500.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password_strength("correct4horse").is_ok());
    }

    #[test]
    fn test_too_short() {
        let violation = validate_password_strength("a1").unwrap_err();
        assert!(violation.errors.iter().any(|e| e.contains("8 characters")));
        assert_eq!(violation.errors.len(), violation.suggestions.len());
    }

    #[test]
    fn test_missing_classes_are_all_reported() {
        let violation = validate_password_strength("!!!!").unwrap_err();
        // Short, no letter, no digit
        assert_eq!(violation.errors.len(), 3);
        assert_eq!(violation.suggestions.len(), 3);
    }

    #[test]
    fn test_no_digit() {
        let violation = validate_password_strength("lettersonly").unwrap_err();
        assert_eq!(violation.errors.len(), 1);
        assert!(violation.errors.first().unwrap().contains("number"));
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct4horse").unwrap();
        assert!(verify_password("correct4horse", &hash));
        assert!(!verify_password("wrong4horse", &hash));
    }

    #[test]
    fn test_verify_garbage_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-hash"));
    }
}

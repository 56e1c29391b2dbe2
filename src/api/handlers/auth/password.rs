//! Password policy checks and argon2 hashing.

use anyhow::{Context, Result, anyhow};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use rand::rngs::OsRng;
use regex::Regex;

pub(super) const MSG_MIN_LENGTH: &str = "Password must be at least 8 characters long";
pub(super) const MSG_LOWERCASE: &str = "Password must contain at least one lowercase letter";
pub(super) const MSG_UPPERCASE: &str = "Password must contain at least one uppercase letter";
pub(super) const MSG_SPECIAL: &str = "Password must contain at least one special character";

/// Outcome of the signup password policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

fn matches_class(pattern: &str, password: &str) -> bool {
    Regex::new(pattern).is_ok_and(|regex| regex.is_match(password))
}

/// Check a candidate password against the signup policy.
///
/// Rules are independent: every violated rule is reported, in policy order.
/// ASCII classes only; there is no maximum length.
#[must_use]
pub fn validate_password(password: &str) -> PasswordCheck {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push(MSG_MIN_LENGTH.to_string());
    }
    if !matches_class("[a-z]", password) {
        errors.push(MSG_LOWERCASE.to_string());
    }
    if !matches_class("[A-Z]", password) {
        errors.push(MSG_UPPERCASE.to_string());
    }
    if !matches_class(
        r##"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"##,
        password,
    ) {
        errors.push(MSG_SPECIAL.to_string());
    }

    PasswordCheck {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Hash a password with a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string.
///
/// Returns `false` for stored values that do not parse as PHC strings, which
/// covers the random placeholders written for Google-only accounts.
#[must_use]
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash on the blocking pool; argon2 must not stall the request executor.
///
/// # Errors
/// Returns an error if the blocking task fails or hashing fails.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")?
}

/// Verify on the blocking pool; see [`hash_password_blocking`].
///
/// # Errors
/// Returns an error if the blocking task fails.
pub async fn verify_password_blocking(hash: String, password: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .context("password verification task failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_always_reports_min_length() {
        // Rule independence: the other violations show up alongside.
        let check = validate_password("a");
        assert!(!check.is_valid);
        assert!(check.errors.contains(&MSG_MIN_LENGTH.to_string()));
        assert!(check.errors.contains(&MSG_UPPERCASE.to_string()));
        assert!(check.errors.contains(&MSG_SPECIAL.to_string()));

        // Short but otherwise compliant still reports min length.
        let check = validate_password("Ab1!");
        assert!(!check.is_valid);
        assert_eq!(check.errors, vec![MSG_MIN_LENGTH.to_string()]);
    }

    #[test]
    fn each_rule_reports_independently() {
        let check = validate_password("ABCDEFG1!");
        assert_eq!(check.errors, vec![MSG_LOWERCASE.to_string()]);

        let check = validate_password("abcdefg1!");
        assert_eq!(check.errors, vec![MSG_UPPERCASE.to_string()]);

        let check = validate_password("Abcdefg1");
        assert_eq!(check.errors, vec![MSG_SPECIAL.to_string()]);
    }

    #[test]
    fn valid_password_passes() {
        let check = validate_password("Abcdef1!");
        assert!(check.is_valid);
        assert!(check.errors.is_empty());
    }

    #[test]
    fn validator_is_pure() {
        let first = validate_password("Tr0ub4dor&3");
        let second = validate_password("Tr0ub4dor&3");
        assert_eq!(first, second);
    }

    #[test]
    fn special_characters_cover_the_policy_set() {
        for special in r##"!@#$%^&*()_+-=[]{};':"\|,.<>/?"##.chars() {
            let candidate = format!("Abcdefg1{special}");
            let check = validate_password(&candidate);
            assert!(check.is_valid, "expected {candidate:?} to pass");
        }
    }

    #[test]
    fn hash_round_trip() {
        let hash = hash_password("Abcdef1!").expect("hash");
        assert!(verify_password(&hash, "Abcdef1!"));
        assert!(!verify_password(&hash, "Abcdef1!!"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("Abcdef1!").expect("hash");
        let second = hash_password("Abcdef1!").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn placeholder_never_verifies() {
        // Google-only accounts store a random non-PHC string.
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", ""));
    }

    #[tokio::test]
    async fn blocking_wrappers_round_trip() {
        let hash = hash_password_blocking("Abcdef1!".to_string())
            .await
            .expect("hash");
        let verified = verify_password_blocking(hash, "Abcdef1!".to_string())
            .await
            .expect("verify");
        assert!(verified);
    }
}

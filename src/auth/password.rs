/// Password hashing and verification
///
/// One-way transform of a plaintext secret into a comparable digest,
/// using bcrypt with per-hash salting. Policy checks run before any
/// hashing so rejected secrets never cost a bcrypt round.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 64;
const SPECIAL_CHARS: &str = "_!@$%";

/// Hash a password with bcrypt after validating the policy.
///
/// # Errors
/// Returns a validation error when the password violates the policy and
/// an internal error if hashing itself fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    validate_password_policy(password)?;

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// Compare a stored digest to a freshly presented candidate.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest)
        .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))
}

/// Policy: 8-64 characters, at least one lowercase letter, one
/// uppercase letter, one digit, one of `_!@$%`, and nothing outside
/// that alphabet.
fn validate_password_policy(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));

    if !has_lowercase || !has_uppercase || !has_digit || !has_special {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            format!(
                "password: must contain alpha numeric characters, any of special characters: {}",
                SPECIAL_CHARS
            ),
        )));
    }

    let illegal = password
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !SPECIAL_CHARS.contains(c));
    if illegal {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "password: contains one or more illegal characters".to_string(),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "Sup3r!Secret";
        let digest = hash_password(password).expect("failed to hash password");

        assert_ne!(password, digest);
        assert!(digest.starts_with("$2"));
    }

    #[test]
    fn test_verify_password() {
        let password = "Sup3r!Secret";
        let digest = hash_password(password).expect("failed to hash password");

        assert!(verify_password(password, &digest).expect("failed to verify password"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let digest = hash_password("Sup3r!Secret").expect("failed to hash password");

        assert!(!verify_password("Wr0ng!Secret", &digest).expect("failed to verify password"));
    }

    #[test]
    fn test_digests_are_salted() {
        let first = hash_password("Sup3r!Secret").expect("failed to hash password");
        let second = hash_password("Sup3r!Secret").expect("failed to hash password");

        assert_ne!(first, second);
    }

    #[test]
    fn test_too_short_password() {
        assert!(hash_password("Sh0rt!").is_err());
    }

    #[test]
    fn test_too_long_password() {
        let long_password = format!("Aa1!{}", "a".repeat(MAX_PASSWORD_LENGTH));
        assert!(hash_password(&long_password).is_err());
    }

    #[test]
    fn test_missing_character_classes() {
        assert!(hash_password("nouppercase1!").is_err());
        assert!(hash_password("NOLOWERCASE1!").is_err());
        assert!(hash_password("NoDigits!!").is_err());
        assert!(hash_password("NoSpecial123").is_err());
    }

    #[test]
    fn test_illegal_characters() {
        assert!(hash_password("Val1d!pass#").is_err());
        assert!(hash_password("Val1d! pass").is_err());
    }
}

/// Input validators for registration and login payloads.
///
/// Length limits bound adversarial inputs; format checks reject
/// non-compliant email addresses and names before any store access.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_NAME_LENGTH: usize = 64;
const MIN_NAME_LENGTH: usize = 1;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address and returns its trimmed form.
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }
    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }
    if !EMAIL_REGEX.is_match(trimmed) || trimmed.matches('@').count() != 1 {
        return Err(ValidationError::InvalidFormat(
            "email: must contain valid email address".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Validates a name field (firstname, lastname) and returns its trimmed form.
pub fn is_valid_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    if trimmed.len() < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort(field.to_string(), MIN_NAME_LENGTH));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field.to_string(), MAX_NAME_LENGTH));
    }
    if trimmed.contains('\0') || trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat(format!(
            "{}: contains control characters",
            field
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_is_trimmed() {
        assert_eq!(
            is_valid_email("  user@example.com ").unwrap(),
            "user@example.com"
        );
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());

        assert!(is_valid_email("a@a").is_err());
    }

    #[test]
    fn test_valid_name() {
        assert!(is_valid_name("firstname", "John").is_ok());
        assert!(is_valid_name("lastname", "O'Brien").is_ok());
        assert!(is_valid_name("lastname", "Jean-Pierre").is_ok());
    }

    #[test]
    fn test_name_length_limits() {
        let too_long = "a".repeat(65);
        assert!(is_valid_name("firstname", &too_long).is_err());
        assert!(is_valid_name("firstname", "").is_err());
        assert!(is_valid_name("firstname", "   ").is_err());
    }

    #[test]
    fn test_name_control_characters() {
        assert!(is_valid_name("firstname", "Name\0null").is_err());
        assert!(is_valid_name("firstname", "Name\twith\ttabs").is_err());
    }
}

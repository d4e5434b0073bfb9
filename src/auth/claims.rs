/// JWT claims structure
///
/// The payload carried by both token classes: the login email as
/// subject, the owning user's stable identifier, and the session
/// identifier minted at issuance, alongside the standard issued-at and
/// expiry timestamps. Claims travel in the clear; they never include
/// the password digest or any secret.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user's login email
    pub sub: String,
    /// Owning user's stable row identifier
    pub id: String,
    /// Session identifier, unique per issuance
    pub uid: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, session_id: &str, expiry_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: email.to_string(),
            id: user_id.to_string(),
            uid: session_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
        }
    }

    /// Extract the owning user's stable identifier.
    ///
    /// # Errors
    /// Returns an error if the embedded identifier is not a valid UUID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.id)
            .map_err(|_| AppError::Internal("invalid user id in token".to_string()))
    }

    /// Seconds until the embedded expiry; zero once passed.
    pub fn expires_in_seconds(&self) -> i64 {
        (self.exp - chrono::Utc::now().timestamp()).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_subject_and_identifiers() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "test@example.com", "session-1", 3600);

        assert_eq!(claims.sub, "test@example.com");
        assert_eq!(claims.id, user_id.to_string());
        assert_eq!(claims.uid, "session-1");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "test@example.com", "session-1", 3600);

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn invalid_user_id_is_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), "test@example.com", "session-1", 3600);
        claims.id = "not-a-uuid".to_string();

        assert!(claims.user_id().is_err());
    }

    #[test]
    fn expires_in_seconds_never_goes_negative() {
        let mut claims = Claims::new(Uuid::new_v4(), "test@example.com", "session-1", 3600);
        claims.exp = claims.iat - 100;

        assert_eq!(claims.expires_in_seconds(), 0);
    }
}

/// Signed-token codec
///
/// Signs and parses compact HS256 JWTs. The caller picks the secret and
/// thereby the token class; a token signed for one class never parses
/// under the other class's secret.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::auth::claims::Claims;
use crate::error::AppError;

/// Reasons a presented token fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not verify under the supplied secret.
    InvalidSignature,
    /// Structurally valid but past its embedded expiry.
    Expired,
    /// Not a decodable token at all.
    Malformed,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::InvalidSignature => write!(f, "token signature is invalid"),
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::Malformed => write!(f, "token is malformed"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

/// Sign claims into a compact token string under `secret`.
pub fn sign_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
}

/// Parse and verify a token string under `secret`.
///
/// Zero leeway: a token is rejected strictly after its expiry instant,
/// consistently on both sides of the boundary.
pub fn parse_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn test_claims() -> Claims {
        Claims::new(Uuid::new_v4(), "test@example.com", "session-1", 3600)
    }

    #[test]
    fn round_trip_preserves_claims() {
        let claims = test_claims();
        let token = sign_token(&claims, SECRET).expect("failed to sign token");
        let parsed = parse_token(&token, SECRET).expect("failed to parse token");

        assert_eq!(parsed, claims);
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let token = sign_token(&test_claims(), SECRET).expect("failed to sign token");
        let result = parse_token(&token, "a-completely-different-secret-value");

        assert_eq!(result.unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = sign_token(&test_claims(), SECRET).expect("failed to sign token");
        let tampered = format!("{}X", token);

        assert!(parse_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            parse_token("not.a.token", SECRET).unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(
            parse_token("", SECRET).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = test_claims();
        claims.iat -= 7200;
        claims.exp = claims.iat + 3600;

        let token = sign_token(&claims, SECRET).expect("failed to sign token");
        assert_eq!(parse_token(&token, SECRET).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn token_well_before_expiry_is_accepted() {
        let mut claims = test_claims();
        claims.exp = claims.iat + 2;

        let token = sign_token(&claims, SECRET).expect("failed to sign token");
        assert!(parse_token(&token, SECRET).is_ok());
    }
}

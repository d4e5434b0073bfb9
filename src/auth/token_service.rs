/// Token service
///
/// Orchestrates issuance, verification, rotation, and revocation of
/// access/refresh token pairs. Access tokens are validated purely
/// offline; refresh tokens additionally require the session store to
/// hold a matching session identifier, which is what makes them
/// revocable. Issuing a pair records the refresh session under the
/// user's stable identifier, overwriting any prior session: at most one
/// refresh session per user is ever live.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::auth::jwt::{parse_token, sign_token};
use crate::configuration::{JwtSettings, TokenDef};
use crate::error::{AppError, AuthError};
use crate::session_store::SessionStore;
use crate::user_store::User;

pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// A freshly signed token plus the out-of-band fields the issuer needs.
/// Exists only for the duration of one issuance call.
struct IssuedToken {
    token: String,
    user_id: Uuid,
    session_id: String,
    claims: Claims,
}

impl IssuedToken {
    fn remaining_lifetime(&self) -> Duration {
        Duration::from_secs(self.claims.expires_in_seconds() as u64)
    }
}

/// Wire shape of a successful issuance.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token remaining lifetime, in seconds.
    pub expires: i64,
}

#[derive(Clone)]
pub struct TokenService {
    jwt: JwtSettings,
    sessions: Arc<dyn SessionStore>,
}

impl TokenService {
    pub fn new(jwt: JwtSettings, sessions: Arc<dyn SessionStore>) -> Self {
        Self { jwt, sessions }
    }

    /// Issue a new access/refresh pair for `user` and record the refresh
    /// session, replacing any prior session for that user.
    ///
    /// Both-or-nothing: if signing or the session write fails, no pair
    /// is returned. Handing out a pair whose session was never recorded
    /// would leave a refresh token that can only ever fail verification.
    pub async fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let access = self.issue(user, &self.jwt.access)?;
        let refresh = self.issue(user, &self.jwt.refresh)?;

        self.sessions
            .put(
                refresh.user_id,
                &refresh.session_id,
                refresh.remaining_lifetime(),
            )
            .await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires: access.claims.expires_in_seconds(),
        })
    }

    /// Validate an access token offline: signature and expiry only.
    ///
    /// No session lookup happens here; access tokens cannot be revoked
    /// before their natural expiry, which their short lifetime bounds.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        parse_token(token, &self.jwt.access.secret).map_err(|e| {
            tracing::warn!(error = %e, "access token rejected");
            AppError::Auth(AuthError::Unauthorized)
        })
    }

    /// Validate a refresh token: signature and expiry, then the session
    /// check. The stored session identifier must equal the one embedded
    /// in the token; a mismatch means the session was rotated away or
    /// revoked. Does not revoke: callers order verification and
    /// revocation themselves.
    pub async fn verify_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = parse_token(token, &self.jwt.refresh.secret).map_err(|e| {
            tracing::warn!(error = %e, "refresh token rejected");
            AppError::Auth(AuthError::Unauthorized)
        })?;

        let user_id = claims.user_id()?;
        // A store failure propagates as such; it must never read as
        // "no session".
        match self.sessions.get(user_id).await? {
            Some(session_id) if session_id == claims.uid => Ok(claims),
            _ => Err(AppError::Auth(AuthError::SessionInvalid)),
        }
    }

    /// Drop the user's active refresh session. The token must still
    /// carry a valid signature even if its session is already gone;
    /// deleting an absent session is a no-op.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<(), AppError> {
        let claims = parse_token(token, &self.jwt.refresh.secret).map_err(|e| {
            tracing::warn!(error = %e, "refresh token rejected on revocation");
            AppError::Auth(AuthError::Unauthorized)
        })?;

        let user_id = claims.user_id()?;
        self.sessions.delete(user_id).await?;
        Ok(())
    }

    fn issue(&self, user: &User, def: &TokenDef) -> Result<IssuedToken, AppError> {
        let session_id = Uuid::new_v4().to_string();
        let claims = Claims::new(user.id, &user.email, &session_id, def.expiry_seconds);
        let token = sign_token(&claims, &def.secret)?;
        Ok(IssuedToken {
            token,
            user_id: user.id,
            session_id,
            claims,
        })
    }
}

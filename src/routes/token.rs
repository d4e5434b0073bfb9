/// Token routes
///
/// Access-token verification (returning the aggregated claims view) and
/// the refresh protocol: verify, load subject, revoke old session,
/// issue new pair.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::authorization::user_details;
use crate::error::{AppError, AuthError, ValidationError};
use crate::startup::AppState;

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /auth/token/verify
///
/// Validates an access token offline and returns the subject's profile,
/// roles, and permissions.
///
/// # Errors
/// - 400: empty token field
/// - 401: expired, malformed, or mis-signed token
/// - 404: token subject no longer exists
pub async fn verify(
    form: web::Json<VerifyRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if form.access_token.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "access_token".to_string(),
        )));
    }

    let claims = state.tokens.verify_access_token(&form.access_token)?;
    let details = user_details(
        state.users.as_ref(),
        state.roles.as_ref(),
        state.permissions.as_ref(),
        &claims.sub,
    )
    .await?;

    Ok(HttpResponse::Ok().json(details))
}

/// POST /auth/token/refresh
///
/// Rotates a refresh session: the presented token must match the
/// recorded session, the old session is revoked, and a fresh pair is
/// issued. A stale token (already rotated away) fails the session
/// check here and cannot mint another pair.
///
/// # Errors
/// - 400: empty token field
/// - 401: expired, malformed, mis-signed, or stale token
/// - 404: token subject no longer exists
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if form.refresh_token.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "refresh_token".to_string(),
        )));
    }

    let claims = state.tokens.verify_refresh_token(&form.refresh_token).await?;
    let user = state
        .users
        .find_by_login(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Auth(AuthError::UnknownUser(claims.sub.clone())))?;

    state.tokens.revoke_refresh_token(&form.refresh_token).await?;
    let pair = state.tokens.issue_pair(&user).await?;

    tracing::info!(user_id = %user.id, "refresh session rotated");

    Ok(HttpResponse::Ok().json(pair))
}

/// Authentication routes
///
/// User registration, email verification, and login.

use actix_web::{web, HttpRequest, HttpResponse};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::auth::{authenticate, hash_password};
use crate::error::{AppError, AuthError, ValidationError};
use crate::startup::AppState;
use crate::user_store::NewUser;
use crate::validators::{is_valid_email, is_valid_name};

const VERIFICATION_CODE_LENGTH: usize = 32;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct VerificationQuery {
    pub email: String,
    pub verification_code: String,
}

/// Outward-facing user projection; the password digest never leaves the
/// service.
#[derive(Serialize)]
pub struct UserResponse {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub verified: bool,
}

/// POST /auth/register
///
/// Creates an unverified user and emails a verification link. The mail
/// dispatch is best-effort: a delivery failure is logged and the
/// registration still succeeds.
///
/// # Errors
/// - 400: non-compliant email, name, or password
/// - 409: email already registered
pub async fn register(
    req: HttpRequest,
    form: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let firstname = is_valid_name("firstname", &form.firstname)?;
    let lastname = is_valid_name("lastname", &form.lastname)?;
    let password_hash = hash_password(&form.password)?;

    let verification_code = generate_verification_code();
    let user = state
        .users
        .insert(NewUser {
            email,
            firstname,
            lastname,
            password_hash,
            verification_code,
        })
        .await?;

    let link = format!(
        "http://{}/auth/email_verification?email={}&verification_code={}",
        req.connection_info().host(),
        user.email,
        user.verification_code,
    );
    let body = format!(
        "<p>Welcome {}!</p>\
         <p>Please <a href=\"{}\">verify your email address</a> to activate your account.</p>",
        user.firstname, link
    );
    if let Err(e) = state
        .mailer
        .send(&user.email, "Please verify your email address", &body)
        .await
    {
        tracing::warn!(user_email = %user.email, error = %e, "verification email not sent");
    }

    tracing::info!(user_id = %user.id, "user registered");

    Ok(HttpResponse::Created().json(UserResponse {
        firstname: user.firstname,
        lastname: user.lastname,
        email: user.email,
        verified: user.verified,
    }))
}

/// GET /auth/email_verification?email=..&verification_code=..
///
/// Marks the account verified when the one-time code matches.
///
/// # Errors
/// - 400: code does not match
/// - 404: unknown user
pub async fn verify_email(
    query: web::Query<VerificationQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .users
        .find_by_login(&query.email)
        .await?
        .ok_or_else(|| AppError::Auth(AuthError::UnknownUser(query.email.clone())))?;

    if user.verified {
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "email address is already verified"
        })));
    }
    if user.verification_code != query.verification_code {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "verification_code: does not match".to_string(),
        )));
    }

    state.users.set_verified(&user.email, true).await?;
    tracing::info!(user_id = %user.id, "email address verified");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "email address verified, you can now log in"
    })))
}

/// POST /auth/login
///
/// Authenticates credentials and issues a token pair.
///
/// # Errors
/// - 400: malformed input
/// - 401: credentials mismatch
/// - 403: account not verified
/// - 404: unknown user
pub async fn login(
    form: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    if form.password.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "password".to_string(),
        )));
    }

    let user = authenticate(state.users.as_ref(), &email, &form.password).await?;
    let pair = state.tokens.issue_pair(&user).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(pair))
}

fn generate_verification_code() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFICATION_CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_codes_are_alphanumeric_and_sized() {
        let code = generate_verification_code();

        assert_eq!(code.len(), VERIFICATION_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_alphanumeric()));
    }

    #[test]
    fn verification_codes_are_unique() {
        assert_ne!(generate_verification_code(), generate_verification_code());
    }
}

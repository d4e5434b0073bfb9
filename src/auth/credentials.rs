/// Credential verification
///
/// Validates a login attempt against the stored user record. Callers
/// must scrub the password digest from any outward-facing projection of
/// the returned record.

use crate::auth::password::verify_password;
use crate::error::{AppError, AuthError};
use crate::user_store::{User, UserStore};

/// Authenticate a login email and candidate secret.
///
/// # Errors
/// - `UnknownUser` when no record matches the email
/// - `CredentialMismatch` when the digest comparison fails
/// - `NotVerified` when the account's email was never verified
pub async fn authenticate(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = users
        .find_by_login(email)
        .await?
        .ok_or_else(|| AppError::Auth(AuthError::UnknownUser(email.to_string())))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Auth(AuthError::CredentialMismatch));
    }
    if !user.verified {
        return Err(AppError::Auth(AuthError::NotVerified(email.to_string())));
    }

    Ok(user)
}

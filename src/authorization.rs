/// Authorization claims aggregation
///
/// Composes a verified subject's profile, role names, and permission
/// names into a single view. All three reads must succeed; the first
/// failure propagates and no partial view is ever returned.

use serde::Serialize;

use crate::error::{AppError, AuthError};
use crate::user_store::{PermissionStore, RoleStore, UserStore};

/// Per-request claims view. Never persisted; the password digest is
/// scrubbed by construction.
#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

/// Build the claims view for a verified subject's login email.
pub async fn user_details(
    users: &dyn UserStore,
    roles: &dyn RoleStore,
    permissions: &dyn PermissionStore,
    login: &str,
) -> Result<UserDetails, AppError> {
    let user = users
        .find_by_login(login)
        .await?
        .ok_or_else(|| AppError::Auth(AuthError::UnknownUser(login.to_string())))?;
    let roles = roles.list_for_user(login).await?;
    let permissions = permissions.list_for_user(login).await?;

    Ok(UserDetails {
        firstname: user.firstname,
        lastname: user.lastname,
        email: user.email,
        roles: roles.into_iter().map(|r| r.name).collect(),
        permissions: permissions.into_iter().map(|p| p.name).collect(),
    })
}

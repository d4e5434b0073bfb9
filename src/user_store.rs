/// User, role, and permission models plus the narrow store contracts the
/// core consumes. The relational implementation lives in `db`; an
/// in-process implementation backs tests and single-node setups.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;

/// A stored user record.
///
/// `id` is the stable row identifier embedded in tokens, so changing the
/// login email never invalidates issued tokens. The email is the
/// external login key and compares case-insensitively. The password
/// digest must never appear in an outward-facing projection.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub password_hash: String,
    pub verified: bool,
    pub verification_code: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Permission {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// Registration payload for `UserStore::insert`; the store assigns the
/// stable row identifier.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub password_hash: String,
    pub verification_code: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by login email, case-insensitively.
    async fn find_by_login(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a new, unverified user and returns the stored record.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Flips the verification flag for a login email.
    async fn set_verified(&self, email: &str, verified: bool) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Roles assigned to the login email, ordered by name.
    async fn list_for_user(&self, email: &str) -> Result<Vec<Role>, StoreError>;
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Permissions granted to the login email through its roles, ordered by name.
    async fn list_for_user(&self, email: &str) -> Result<Vec<Permission>, StoreError>;
}

/// In-process user directory with the same contract as the relational
/// store. Backs unit and integration tests.
#[derive(Default)]
pub struct InMemoryAuthStore {
    users: Mutex<Vec<User>>,
    roles: Mutex<HashMap<String, Vec<Role>>>,
    permissions: Mutex<HashMap<String, Vec<Permission>>>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign_roles(&self, email: &str, roles: Vec<Role>) {
        self.roles
            .lock()
            .unwrap()
            .insert(email.to_lowercase(), roles);
    }

    pub fn assign_permissions(&self, email: &str, permissions: Vec<Permission>) {
        self.permissions
            .lock()
            .unwrap()
            .insert(email.to_lowercase(), permissions);
    }
}

#[async_trait]
impl UserStore for InMemoryAuthStore {
    async fn find_by_login(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::UniqueViolation(
                "email already registered".to_string(),
            ));
        }
        let stored = User {
            id: Uuid::new_v4(),
            email: user.email,
            firstname: user.firstname,
            lastname: user.lastname,
            password_hash: user.password_hash,
            verified: false,
            verification_code: user.verification_code,
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn set_verified(&self, email: &str, verified: bool) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.email.eq_ignore_ascii_case(email)) {
            Some(user) => {
                user.verified = verified;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("user {}", email))),
        }
    }
}

#[async_trait]
impl RoleStore for InMemoryAuthStore {
    async fn list_for_user(&self, email: &str) -> Result<Vec<Role>, StoreError> {
        let mut roles = self
            .roles
            .lock()
            .unwrap()
            .get(&email.to_lowercase())
            .cloned()
            .unwrap_or_default();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }
}

#[async_trait]
impl PermissionStore for InMemoryAuthStore {
    async fn list_for_user(&self, email: &str) -> Result<Vec<Permission>, StoreError> {
        let mut permissions = self
            .permissions
            .lock()
            .unwrap()
            .get(&email.to_lowercase())
            .cloned()
            .unwrap_or_default();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
            password_hash: "digest".to_string(),
            verification_code: "code".to_string(),
        }
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let store = InMemoryAuthStore::new();
        store.insert(new_user("Alice@Example.com")).await.unwrap();

        let found = store.find_by_login("alice@example.com").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().email, "Alice@Example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryAuthStore::new();
        store.insert(new_user("alice@example.com")).await.unwrap();

        let result = store.insert(new_user("ALICE@example.com")).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn set_verified_flips_the_flag() {
        let store = InMemoryAuthStore::new();
        store.insert(new_user("alice@example.com")).await.unwrap();

        store.set_verified("alice@example.com", true).await.unwrap();
        let user = store
            .find_by_login("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(user.verified);
    }

    #[tokio::test]
    async fn set_verified_for_unknown_user_is_not_found() {
        let store = InMemoryAuthStore::new();
        let result = store.set_verified("ghost@example.com", true).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn roles_are_ordered_by_name() {
        let store = InMemoryAuthStore::new();
        store.assign_roles(
            "alice@example.com",
            vec![
                Role {
                    id: 2,
                    name: "editor".to_string(),
                    description: String::new(),
                },
                Role {
                    id: 1,
                    name: "admin".to_string(),
                    description: String::new(),
                },
            ],
        );

        let roles = RoleStore::list_for_user(&store, "alice@example.com")
            .await
            .unwrap();
        let names: Vec<_> = roles.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["admin", "editor"]);
    }
}

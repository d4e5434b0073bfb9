/// Postgres-backed implementation of the user, role, and permission
/// store contracts.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::user_store::{NewUser, Permission, PermissionStore, Role, User, UserStore};

#[derive(Clone)]
pub struct AuthDb {
    pool: PgPool,
}

impl AuthDb {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for AuthDb {
    async fn find_by_login(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, firstname, lastname, password_hash, verified, verification_code
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO users
                (id, email, firstname, lastname, password_hash, verified, verification_code,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.password_hash)
        .bind(&user.verification_code)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            email: user.email,
            firstname: user.firstname,
            lastname: user.lastname,
            password_hash: user.password_hash,
            verified: false,
            verification_code: user.verification_code,
        })
    }

    async fn set_verified(&self, email: &str, verified: bool) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET verified = $2, updated_at = $3
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .bind(verified)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {}", email)));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for AuthDb {
    async fn list_for_user(&self, email: &str) -> Result<Vec<Role>, StoreError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.description
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            JOIN users u ON u.id = ur.user_id
            WHERE lower(u.email) = lower($1)
            ORDER BY r.name
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }
}

#[async_trait]
impl PermissionStore for AuthDb {
    async fn list_for_user(&self, email: &str) -> Result<Vec<Permission>, StoreError> {
        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT DISTINCT p.id, p.name, p.description
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            JOIN user_roles ur ON ur.role_id = rp.role_id
            JOIN users u ON u.id = ur.user_id
            WHERE lower(u.email) = lower($1)
            ORDER BY p.name
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(permissions)
    }
}

//! # User Repository
//!
//! Branches and desk users, with Argon2 password hashing.
//!
//! ## Login Flow
//! ```text
//! POST /api/login {username, password}
//!      │
//!      ▼
//! UserRepository::authenticate ──► users row by username
//!      │                               │
//!      │                               ▼
//!      │                    Argon2 verify(password, password_hash)
//!      ▼
//! Some(User) ──► inn-api issues a session token (user_id, branch_id, role)
//! None       ──► 401 "Invalid username or password."
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use inn_core::User;

/// Repository for branches and users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a branch and returns its id.
    pub async fn create_branch(&self, name: &str) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO branches (name, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(branch_id = id, name = %name, "Branch created");
        Ok(id)
    }

    /// Creates a user with a freshly hashed password.
    pub async fn create_user(
        &self,
        branch_id: i64,
        username: &str,
        password: &str,
        role: &str,
    ) -> DbResult<User> {
        let password_hash = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (branch_id, username, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, branch_id, username, password_hash, role, created_at
            "#,
        )
        .bind(branch_id)
        .bind(username.trim())
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, username),
            other => other,
        })?;

        info!(user_id = user.id, branch_id, username = %user.username, "User created");
        Ok(user)
    }

    /// Gets a user by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, branch_id, username, password_hash, role, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Checks a username/password pair.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - Credentials match
    /// * `Ok(None)` - Unknown user or wrong password (indistinguishable)
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        let Some(user) = self.get_by_username(username).await? else {
            debug!(username = %username, "Login for unknown user");
            return Ok(None);
        };

        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            debug!(user_id = user.id, "Login with wrong password");
            Ok(None)
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Hash a password for storage.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_authenticate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let branch = users.create_branch("Main").await.unwrap();
        let user = users
            .create_user(branch, "desk", "s3cret", "staff")
            .await
            .unwrap();
        assert_ne!(user.password_hash, "s3cret");

        let ok = users.authenticate("desk", "s3cret").await.unwrap();
        assert_eq!(ok.map(|u| u.branch_id), Some(branch));

        assert!(users.authenticate("desk", "wrong").await.unwrap().is_none());
        assert!(users.authenticate("nobody", "s3cret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();
        let branch = users.create_branch("Main").await.unwrap();

        users.create_user(branch, "desk", "a", "staff").await.unwrap();
        let err = users.create_user(branch, "desk", "b", "staff").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("x", "not-a-phc-string"));
    }
}

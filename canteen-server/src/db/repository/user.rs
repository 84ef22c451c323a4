//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Role, User};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseRepository::new(pool),
        }
    }

    /// Find all users
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role FROM users ORDER BY id",
        )
        .fetch_all(self.base.pool())
        .await?;
        Ok(users)
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?;
        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role FROM users WHERE email = ? LIMIT 1",
        )
        .bind(email)
        .fetch_optional(self.base.pool())
        .await?;
        Ok(user)
    }

    /// Create a new user with an already-hashed password
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> RepoResult<User> {
        // Check duplicate email
        if self.find_by_email(email).await?.is_some() {
            return Err(RepoError::Duplicate("Email already registered".to_string()));
        }

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password_hash, role)
               VALUES (?, ?, ?, ?)
               RETURNING id, name, email, password_hash, role"#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.base.pool())
        .await?;
        Ok(user)
    }

    /// Count users holding the admin role
    pub async fn count_admins(&self) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(self.base.pool())
            .await?;
        Ok(count)
    }

    /// Change a user's role
    pub async fn set_role(&self, id: i64, role: Role) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users SET role = ? WHERE id = ?
               RETURNING id, name, email, password_hash, role"#,
        )
        .bind(role)
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?;

        user.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }
}

//! User repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::models::page::Page;
use crate::models::user::{User, NewUser};
use crate::utils::errors::Result;
use super::map_unique_violation;

const USER_COLUMNS: &str = "id, name, email, comments_blocked";

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    /// Users ordered by id; `ids` narrows the set when given and non-empty
    async fn list(&self, ids: Option<&[i64]>, page: Page) -> Result<Vec<User>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Set the comment ban flag on every listed user that exists, returning them by id
    async fn set_comments_blocked(&self, ids: &[i64], blocked: bool) -> Result<Vec<User>>;
}

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &format!("User with email {}", user.email)))?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    async fn list(&self, ids: Option<&[i64]>, page: Page) -> Result<Vec<User>> {
        let users = match ids.filter(|ids| !ids.is_empty()) {
            Some(ids) => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {} FROM users WHERE id = ANY($1) ORDER BY id LIMIT $2 OFFSET $3",
                    USER_COLUMNS
                ))
                .bind(ids.to_vec())
                .bind(page.size)
                .bind(page.from)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
                    USER_COLUMNS
                ))
                .bind(page.size)
                .bind(page.from)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(users)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_comments_blocked(&self, ids: &[i64], blocked: bool) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut users = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET comments_blocked = $2 WHERE id = ANY($1) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(ids.to_vec())
        .bind(blocked)
        .fetch_all(&self.pool)
        .await?;

        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

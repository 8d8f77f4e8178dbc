//! Category repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::models::category::{Category, NewCategory};
use crate::models::page::Page;
use crate::utils::errors::Result;
use super::map_unique_violation;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn create(&self, category: NewCategory) -> Result<Category>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>>;

    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    async fn update(&self, id: i64, category: NewCategory) -> Result<Option<Category>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn list(&self, page: Page) -> Result<Vec<Category>>;
}

#[derive(Clone, Debug)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn create(&self, category: NewCategory) -> Result<Category> {
        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name"
        )
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &format!("Category {}", category.name)))?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    async fn update(&self, id: i64, category: NewCategory) -> Result<Option<Category>> {
        let updated = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name"
        )
        .bind(id)
        .bind(&category.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &format!("Category {}", category.name)))?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: Page) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories ORDER BY id LIMIT $1 OFFSET $2"
        )
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}

//! Comment repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::models::comment::{Comment, NewCommentRecord};
use crate::models::page::Page;
use crate::utils::errors::Result;

const COMMENT_COLUMNS: &str = "id, text, event_id, author_id, created, edited";

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(&self, comment: NewCommentRecord) -> Result<Comment>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Persist the text and edit time; `None` when the comment is gone
    async fn save(&self, comment: &Comment) -> Result<Option<Comment>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Comments of one event, oldest first
    async fn find_by_event(&self, event_id: i64, page: Page) -> Result<Vec<Comment>>;

    async fn find_by_event_and_author(&self, event_id: i64, author_id: i64) -> Result<Vec<Comment>>;
}

#[derive(Clone, Debug)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn create(&self, comment: NewCommentRecord) -> Result<Comment> {
        let created = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (text, event_id, author_id, created) VALUES ($1, $2, $3, $4) RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(&comment.text)
        .bind(comment.event_id)
        .bind(comment.author_id)
        .bind(comment.created)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn save(&self, comment: &Comment) -> Result<Option<Comment>> {
        let saved = sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET text = $2, edited = $3 WHERE id = $1 RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(comment.id)
        .bind(&comment.text)
        .bind(comment.edited)
        .fetch_optional(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_event(&self, event_id: i64, page: Page) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE event_id = $1 ORDER BY created, id LIMIT $2 OFFSET $3",
            COMMENT_COLUMNS
        ))
        .bind(event_id)
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn find_by_event_and_author(&self, event_id: i64, author_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE event_id = $1 AND author_id = $2 ORDER BY created, id",
            COMMENT_COLUMNS
        ))
        .bind(event_id)
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}

//! Comment report repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::models::report::{CommentReport, NewCommentReport};
use crate::utils::errors::Result;
use super::map_unique_violation;

const REPORT_COLUMNS: &str = "id, comment_id, reporter_id, reported_user_id, created";

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// A reporter flags a given comment at most once
    async fn create(&self, report: NewCommentReport) -> Result<CommentReport>;

    async fn find_by_reported_user(&self, user_id: i64) -> Result<Vec<CommentReport>>;
}

#[derive(Clone, Debug)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for ReportRepository {
    async fn create(&self, report: NewCommentReport) -> Result<CommentReport> {
        let created = sqlx::query_as::<_, CommentReport>(&format!(
            "INSERT INTO comment_reports (comment_id, reporter_id, reported_user_id, created) VALUES ($1, $2, $3, NOW()) RETURNING {}",
            REPORT_COLUMNS
        ))
        .bind(report.comment_id)
        .bind(report.reporter_id)
        .bind(report.reported_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Report of this comment"))?;

        Ok(created)
    }

    async fn find_by_reported_user(&self, user_id: i64) -> Result<Vec<CommentReport>> {
        let reports = sqlx::query_as::<_, CommentReport>(&format!(
            "SELECT {} FROM comment_reports WHERE reported_user_id = $1 ORDER BY id",
            REPORT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }
}

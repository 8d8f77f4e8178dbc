//! Event comments and comment reports
//!
//! Users comment on published events. Banned users keep read access but
//! cannot write, and any user may flag someone else's comment once.

use std::sync::Arc;
use chrono::Utc;
use tracing::info;
use crate::database::{CommentStore, EventStore, ReportStore, UserStore};
use crate::models::comment::{Comment, NewComment, NewCommentRecord};
use crate::models::page::Page;
use crate::models::report::{CommentReport, NewCommentReport};
use crate::models::user::User;
use crate::utils::errors::{EwmError, Result};
use crate::utils::logging::log_admin_action;

const MAX_COMMENT_LENGTH: usize = 2000;

fn validate_text(comment: &NewComment) -> Result<()> {
    let len = comment.text.trim().chars().count();
    if len == 0 || len > MAX_COMMENT_LENGTH {
        return Err(EwmError::Validation(format!(
            "Field: text. Error: length must be between 1 and {}. Value: {}",
            MAX_COMMENT_LENGTH, len
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CommentService {
    users: Arc<dyn UserStore>,
    events: Arc<dyn EventStore>,
    comments: Arc<dyn CommentStore>,
    reports: Arc<dyn ReportStore>,
}

impl CommentService {
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
        comments: Arc<dyn CommentStore>,
        reports: Arc<dyn ReportStore>,
    ) -> Self {
        Self { users, events, comments, reports }
    }

    async fn user(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EwmError::UserNotFound { user_id })
    }

    /// Existing author allowed to write comments
    async fn writer(&self, user_id: i64) -> Result<User> {
        let user = self.user(user_id).await?;
        if user.comments_blocked {
            return Err(EwmError::PermissionDenied(format!(
                "User with id={} is banned from commenting",
                user_id
            )));
        }
        Ok(user)
    }

    async fn own_comment(&self, user_id: i64, comment_id: i64) -> Result<Comment> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.author_id == user_id)
            .ok_or(EwmError::CommentNotFound { comment_id })
    }

    pub async fn add_comment(&self, user_id: i64, event_id: i64, comment: NewComment) -> Result<Comment> {
        self.writer(user_id).await?;
        self.events
            .find_published(event_id)
            .await?
            .ok_or(EwmError::EventNotFound { event_id })?;
        validate_text(&comment)?;

        let created = self
            .comments
            .create(NewCommentRecord {
                text: comment.text,
                event_id,
                author_id: user_id,
                created: Utc::now(),
            })
            .await?;
        info!(comment_id = created.id, event_id = event_id, user_id = user_id, "Comment added");
        Ok(created)
    }

    pub async fn update_comment(&self, user_id: i64, comment_id: i64, update: NewComment) -> Result<Comment> {
        self.writer(user_id).await?;
        let mut comment = self.own_comment(user_id, comment_id).await?;
        validate_text(&update)?;

        comment.text = update.text;
        comment.edited = Some(Utc::now());
        self.comments
            .save(&comment)
            .await?
            .ok_or(EwmError::CommentNotFound { comment_id })
    }

    /// Authors may remove their comments even while banned
    pub async fn delete_comment(&self, user_id: i64, comment_id: i64) -> Result<()> {
        self.user(user_id).await?;
        self.own_comment(user_id, comment_id).await?;
        self.comments.delete(comment_id).await?;
        info!(comment_id = comment_id, user_id = user_id, "Comment deleted");
        Ok(())
    }

    pub async fn delete_comment_by_admin(&self, comment_id: i64) -> Result<()> {
        if !self.comments.delete(comment_id).await? {
            return Err(EwmError::CommentNotFound { comment_id });
        }
        log_admin_action("delete_comment", Some(comment_id.to_string().as_str()), None);
        Ok(())
    }

    /// Public listing; only published events expose their comments
    pub async fn get_event_comments(&self, event_id: i64, page: Page) -> Result<Vec<Comment>> {
        self.events
            .find_published(event_id)
            .await?
            .ok_or(EwmError::EventNotFound { event_id })?;
        self.comments.find_by_event(event_id, page).await
    }

    pub async fn report_comment(&self, reporter_id: i64, comment_id: i64) -> Result<CommentReport> {
        self.user(reporter_id).await?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(EwmError::CommentNotFound { comment_id })?;
        if comment.author_id == reporter_id {
            return Err(EwmError::Conflict("Users cannot report their own comments".to_string()));
        }

        let report = self
            .reports
            .create(NewCommentReport {
                comment_id,
                reporter_id,
                reported_user_id: comment.author_id,
            })
            .await?;
        info!(comment_id = comment_id, reporter_id = reporter_id, reported_user_id = comment.author_id, "Comment reported");
        Ok(report)
    }
}

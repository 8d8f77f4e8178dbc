//! Event comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub event_id: i64,
    pub author_id: i64,
    pub created: DateTime<Utc>,
    pub edited: Option<DateTime<Utc>>,
}

/// Comment body as submitted by its author
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct NewCommentRecord {
    pub text: String,
    pub event_id: i64,
    pub author_id: i64,
    pub created: DateTime<Utc>,
}

/// Compact form embedded into event views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentShort {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentShort {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author_id: comment.author_id,
            created: comment.created,
        }
    }
}

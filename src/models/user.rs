//! User model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Banned users may still read but not write comments
    pub comments_blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentBanAction {
    Banned,
    Unbanned,
}

impl CommentBanAction {
    pub fn blocks(self) -> bool {
        self == CommentBanAction::Banned
    }
}

impl std::str::FromStr for CommentBanAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BANNED" | "BAN" => Ok(CommentBanAction::Banned),
            "UNBANNED" | "UNBAN" => Ok(CommentBanAction::Unbanned),
            other => Err(format!("Unknown comment ban action: {}", other)),
        }
    }
}

/// Bulk ban or unban of commenting rights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentBanUpdate {
    pub user_ids: Vec<i64>,
    pub status: CommentBanAction,
}

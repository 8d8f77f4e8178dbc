//! Comment moderation commands

use serde_json::Value;
use crate::models::user::{CommentBanAction, CommentBanUpdate};
use crate::services::ServiceFactory;
use crate::utils::errors::{EwmError, Result};

pub async fn handle_comment_ban(services: &ServiceFactory, user_ids: Vec<i64>, status: &str) -> Result<Value> {
    let status: CommentBanAction = status.parse().map_err(EwmError::Validation)?;
    let users = services
        .user_service
        .change_comments_status(CommentBanUpdate { user_ids, status })
        .await?;
    Ok(serde_json::json!({ "users": users }))
}

pub async fn handle_report(services: &ServiceFactory, user_id: i64) -> Result<Value> {
    let report = services.report_service.get_report_by_user_id(user_id).await?;
    Ok(serde_json::to_value(report)?)
}

pub async fn handle_delete_comment(services: &ServiceFactory, comment_id: i64) -> Result<Value> {
    services.comment_service.delete_comment_by_admin(comment_id).await?;
    Ok(serde_json::json!({ "deleted": comment_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::handlers::commands::events::handle_publish;
    use crate::handlers::commands::test_support::seeded;
    use crate::models::comment::NewComment;
    use crate::models::user::NewUser;

    #[tokio::test]
    async fn test_ban_then_report_then_delete() {
        let (services, stores, event) = seeded().await;
        handle_publish(&services, event.id).await.unwrap();

        let author = stores
            .users
            .create(NewUser { name: "Loud".to_string(), email: "loud@example.com".to_string() })
            .await
            .unwrap();
        let comment = services
            .comment_service
            .add_comment(author.id, event.id, NewComment { text: "Worst band ever".to_string() })
            .await
            .unwrap();
        services.comment_service.report_comment(event.initiator_id, comment.id).await.unwrap();

        let report = handle_report(&services, author.id).await.unwrap();
        assert_eq!(report["reports"], 1);
        assert_eq!(report["comment_ids"][0], comment.id);

        let banned = handle_comment_ban(&services, vec![author.id], "banned").await.unwrap();
        assert_eq!(banned["users"][0]["comments_blocked"], true);

        handle_delete_comment(&services, comment.id).await.unwrap();
        let err = handle_delete_comment(&services, comment.id).await.unwrap_err();
        assert_matches!(err, EwmError::CommentNotFound { .. });
    }

    #[tokio::test]
    async fn test_unknown_ban_status_is_rejected() {
        let (services, _, _) = seeded().await;
        let err = handle_comment_ban(&services, vec![1], "muted").await.unwrap_err();
        assert_matches!(err, EwmError::Validation(_));
    }
}

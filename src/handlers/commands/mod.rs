//! Admin command definitions and dispatch

pub mod comments;
pub mod events;
pub mod requests;

use clap::Subcommand;
use serde_json::{json, Value};
use crate::models::page::Page;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Operations available from the command line
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Publish a pending event
    Publish {
        event_id: i64,
    },

    /// Reject a pending event
    Reject {
        event_id: i64,
    },

    /// Search events with admin filters
    Search {
        /// Initiator ids
        #[arg(long, value_delimiter = ',')]
        users: Option<Vec<i64>>,

        /// Event states (PENDING, PUBLISHED, CANCELED)
        #[arg(long, value_delimiter = ',')]
        states: Option<Vec<String>>,

        /// Category ids
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<i64>>,

        /// Lower bound, `yyyy-MM-dd HH:mm:ss`
        #[arg(long)]
        start: Option<String>,

        /// Upper bound, `yyyy-MM-dd HH:mm:ss`
        #[arg(long)]
        end: Option<String>,

        #[arg(long, default_value_t = 0)]
        from: i64,

        /// Defaults to the configured page size
        #[arg(long)]
        size: Option<i64>,
    },

    /// List requests submitted to an event
    Requests {
        user_id: i64,
        event_id: i64,
    },

    /// Confirm or reject participation requests
    Approve {
        user_id: i64,
        event_id: i64,

        /// CONFIRMED or REJECTED
        #[arg(long)]
        status: String,

        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },

    /// Ban or unban commenting for users
    CommentBan {
        /// BANNED or UNBANNED
        #[arg(long)]
        status: String,

        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },

    /// Show reports filed against a user's comments
    Report {
        user_id: i64,
    },

    /// Remove a comment
    DeleteComment {
        comment_id: i64,
    },

    /// Check the store and the stats service
    Health,
}

/// Run a command against the services and render its outcome
pub async fn handle_command(services: &ServiceFactory, command: Command, default_page_size: i64) -> Result<Value> {
    match command {
        Command::Publish { event_id } => events::handle_publish(services, event_id).await,
        Command::Reject { event_id } => events::handle_reject(services, event_id).await,
        Command::Search { users, states, categories, start, end, from, size } => {
            let page = Page::new(from, size.unwrap_or(default_page_size))?;
            let filter = events::SearchArgs { users, states, categories, start, end };
            events::handle_search(services, filter, page).await
        }
        Command::Requests { user_id, event_id } => requests::handle_requests(services, user_id, event_id).await,
        Command::Approve { user_id, event_id, status, ids } => {
            requests::handle_approve(services, user_id, event_id, &status, ids).await
        }
        Command::CommentBan { status, ids } => comments::handle_comment_ban(services, ids, &status).await,
        Command::Report { user_id } => comments::handle_report(services, user_id).await,
        Command::DeleteComment { comment_id } => comments::handle_delete_comment(services, comment_id).await,
        Command::Health => {
            let status = services.health_check().await;
            Ok(json!({
                "healthy": status.is_healthy(),
                "store": status.store_healthy,
                "stats": status.stats_healthy,
                "issues": status.get_issues(),
            }))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::test_support::seeded;

    #[tokio::test]
    async fn test_health_reports_healthy_in_memory_store() {
        let (services, _, _) = seeded().await;
        let value = handle_command(&services, Command::Health, 10).await.unwrap();
        assert_eq!(value["healthy"], true);
        assert_eq!(value["issues"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_rejects_zero_page_size() {
        let (services, _, _) = seeded().await;
        let command = Command::Search {
            users: None,
            states: None,
            categories: None,
            start: None,
            end: None,
            from: 0,
            size: Some(0),
        };
        assert!(handle_command(&services, command, 10).await.is_err());
    }
}

//! User administration

use std::sync::Arc;
use tracing::{debug, info};
use crate::database::UserStore;
use crate::models::page::Page;
use crate::models::user::{CommentBanUpdate, NewUser, User};
use crate::utils::errors::{EwmError, Result};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a user; emails are unique
    pub async fn create(&self, user: NewUser) -> Result<User> {
        if user.name.trim().is_empty() {
            return Err(EwmError::Validation("Field: name. Error: must not be blank".to_string()));
        }
        if !user.email.contains('@') {
            return Err(EwmError::Validation(format!(
                "Field: email. Error: must be a well-formed email address. Value: {}",
                user.email
            )));
        }

        let created = self.users.create(user).await?;
        info!(user_id = created.id, "User created");
        Ok(created)
    }

    pub async fn get(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(EwmError::UserNotFound { user_id })
    }

    pub async fn list(&self, ids: Option<&[i64]>, page: Page) -> Result<Vec<User>> {
        debug!(from = page.from, size = page.size, "Listing users");
        self.users.list(ids, page).await
    }

    pub async fn delete(&self, user_id: i64) -> Result<()> {
        if !self.users.delete(user_id).await? {
            return Err(EwmError::UserNotFound { user_id });
        }
        log_admin_action("delete_user", Some(user_id.to_string().as_str()), None);
        Ok(())
    }

    /// Ban or unban commenting for every listed user; unknown ids are skipped
    pub async fn change_comments_status(&self, update: CommentBanUpdate) -> Result<Vec<User>> {
        let users = self
            .users
            .set_comments_blocked(&update.user_ids, update.status.blocks())
            .await?;
        let details = format!("{:?} {} user(s)", update.status, users.len());
        log_admin_action("change_comments_status", None, Some(details.as_str()));
        Ok(users)
    }
}

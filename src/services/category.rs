//! Category administration

use std::sync::Arc;
use tracing::info;
use crate::database::{CategoryStore, EventStore};
use crate::models::category::{Category, NewCategory};
use crate::models::page::Page;
use crate::utils::errors::{EwmError, Result};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    events: Arc<dyn EventStore>,
}

fn validate_name(category: &NewCategory) -> Result<()> {
    if category.name.trim().is_empty() {
        return Err(EwmError::Validation("Field: name. Error: must not be blank".to_string()));
    }
    Ok(())
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>, events: Arc<dyn EventStore>) -> Self {
        Self { categories, events }
    }

    pub async fn create(&self, category: NewCategory) -> Result<Category> {
        validate_name(&category)?;
        let created = self.categories.create(category).await?;
        info!(category_id = created.id, name = %created.name, "Category created");
        Ok(created)
    }

    pub async fn update(&self, category_id: i64, category: NewCategory) -> Result<Category> {
        validate_name(&category)?;
        self.categories
            .update(category_id, category)
            .await?
            .ok_or(EwmError::CategoryNotFound { category_id })
    }

    /// Categories still referenced by events cannot be removed
    pub async fn delete(&self, category_id: i64) -> Result<()> {
        if !self.categories.exists_by_id(category_id).await? {
            return Err(EwmError::CategoryNotFound { category_id });
        }
        if self.events.exists_with_category(category_id).await? {
            return Err(EwmError::Conflict(format!("The category with id={} is not empty", category_id)));
        }

        self.categories.delete(category_id).await?;
        log_admin_action("delete_category", Some(category_id.to_string().as_str()), None);
        Ok(())
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Category>> {
        self.categories.list(page).await
    }

    pub async fn get(&self, category_id: i64) -> Result<Category> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or(EwmError::CategoryNotFound { category_id })
    }
}

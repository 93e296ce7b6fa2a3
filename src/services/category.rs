//! Category management service
//!
//! Categories classify events. Names are unique, and a category that still
//! has events cannot be removed.

use tracing::info;

use crate::database::{CategoryRepository, EventRepository};
use crate::models::category::{Category, NewCategory, UpdateCategory};
use crate::utils::errors::{EventHiveError, Result};

/// Category management service
#[derive(Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
    events: EventRepository,
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(categories: CategoryRepository, events: EventRepository) -> Self {
        Self { categories, events }
    }

    /// Create a new category
    pub async fn create_category(&self, payload: NewCategory) -> Result<Category> {
        if self.categories.exists_by_name(&payload.name).await? {
            return Err(EventHiveError::Conflict(
                "Category name must be unique".to_string(),
            ));
        }

        let category = self.categories.create(&payload.name).await?;
        info!(category_id = category.id, "Category created");
        Ok(category)
    }

    /// Rename a category
    pub async fn update_category(
        &self,
        category_id: i64,
        payload: UpdateCategory,
    ) -> Result<Category> {
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or(EventHiveError::CategoryNotFound { category_id })?;

        let Some(name) = payload.name else {
            return Ok(category);
        };

        if name != category.name && self.categories.exists_by_name(&name).await? {
            return Err(EventHiveError::Conflict(
                "Category name must be unique".to_string(),
            ));
        }

        let updated = self.categories.update(category_id, &name).await?;
        info!(category_id = category_id, "Category renamed");
        Ok(updated)
    }

    /// Remove a category that has no events
    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or(EventHiveError::CategoryNotFound { category_id })?;

        let in_use = self.events.count_by_category(category_id).await?;
        if in_use > 0 {
            return Err(EventHiveError::Conflict(
                "The category is not empty".to_string(),
            ));
        }

        self.categories.delete(category_id).await?;
        info!(category_id = category_id, "Category deleted");
        Ok(())
    }

    /// Fetch one category
    pub async fn get_category(&self, category_id: i64) -> Result<Category> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or(EventHiveError::CategoryNotFound { category_id })
    }

    /// List categories with pagination
    pub async fn get_categories(&self, from: i64, size: i64) -> Result<Vec<Category>> {
        self.categories.list(size, from).await
    }
}

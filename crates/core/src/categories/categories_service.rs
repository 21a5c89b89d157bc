use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::categories_model::{Category, CategoryUpdate, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::Result;
use crate::transactions::TransactionType;

pub struct CategoryService {
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(category_repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        CategoryService {
            category_repository,
        }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn list_categories(
        &self,
        user_id: &str,
        type_filter: Option<TransactionType>,
    ) -> Result<Vec<Category>> {
        self.category_repository.list_categories(user_id, type_filter)
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.category_repository.get_category(user_id, category_id)
    }

    async fn create_category(&self, new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;

        // A default budget is only meaningful as an expense cap.
        let mut category = new_category;
        if category.category_type.parse::<TransactionType>()? == TransactionType::Income
            && category.default_budget.is_some()
        {
            debug!(
                "dropping default budget on income category '{}' for user {}",
                category.name, category.user_id
            );
            category.default_budget = None;
        }

        self.category_repository.create_category(category).await
    }

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category> {
        let existing = self.category_repository.get_category(user_id, category_id)?;

        let mut update = update;
        if existing.category_type.parse::<TransactionType>()? == TransactionType::Income {
            update.default_budget = None;
        }

        self.category_repository
            .update_category(user_id, category_id, update)
            .await
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.category_repository
            .soft_delete_category(user_id, category_id)
            .await
    }
}

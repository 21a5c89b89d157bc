use async_trait::async_trait;

use super::categories_model::{Category, CategoryUpdate, NewCategory};
use crate::errors::Result;
use crate::transactions::TransactionType;

/// Trait defining the contract for category repository operations.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn list_categories(
        &self,
        user_id: &str,
        type_filter: Option<TransactionType>,
    ) -> Result<Vec<Category>>;
    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
    fn get_categories_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Category>>;
    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;
    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category>;
    async fn soft_delete_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
}

/// Trait defining the contract for category service operations.
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn list_categories(
        &self,
        user_id: &str,
        type_filter: Option<TransactionType>,
    ) -> Result<Vec<Category>>;
    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;
    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category>;
    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
}

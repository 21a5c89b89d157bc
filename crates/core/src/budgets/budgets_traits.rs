use async_trait::async_trait;

use super::budgets_model::Budget;
use crate::errors::Result;

/// Trait defining the contract for budget repository operations.
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn list_budgets(&self, user_id: &str, month: &str) -> Result<Vec<Budget>>;
    async fn upsert_budget(
        &self,
        user_id: &str,
        category_id: Option<String>,
        month: &str,
        amount: i64,
    ) -> Result<Budget>;
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<usize>;
    async fn ensure_default_budgets(&self, user_id: &str, month: &str) -> Result<usize>;
}

/// Trait defining the contract for budget service operations.
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn list_budgets(&self, user_id: &str, year: i32, month: u32) -> Result<Vec<Budget>>;
    async fn set_budget(
        &self,
        user_id: &str,
        category_id: Option<String>,
        year: i32,
        month: u32,
        amount: i64,
    ) -> Result<Budget>;
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<usize>;
}

use std::sync::Arc;

use async_trait::async_trait;

use super::budgets_model::Budget;
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Result, ValidationError};
use crate::transactions::TransactionType;
use crate::utils::time_utils::{month_bounds, month_key};

pub struct BudgetService {
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl BudgetService {
    pub fn new(
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        BudgetService {
            budget_repository,
            category_repository,
        }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn list_budgets(&self, user_id: &str, year: i32, month: u32) -> Result<Vec<Budget>> {
        month_bounds(year, month)?;
        self.budget_repository
            .list_budgets(user_id, &month_key(year, month))
    }

    async fn set_budget(
        &self,
        user_id: &str,
        category_id: Option<String>,
        year: i32,
        month: u32,
        amount: i64,
    ) -> Result<Budget> {
        month_bounds(year, month)?;
        if amount < 0 {
            return Err(ValidationError::InvalidInput(format!(
                "budget amount cannot be negative, got {}",
                amount
            ))
            .into());
        }

        // Budgets cap spending; only expense categories can carry one.
        if let Some(category_id) = &category_id {
            let category = self.category_repository.get_category(user_id, category_id)?;
            if category.category_type.parse::<TransactionType>()? != TransactionType::Expense {
                return Err(ValidationError::InvalidInput(format!(
                    "category '{}' is not an expense category",
                    category.name
                ))
                .into());
            }
        }

        self.budget_repository
            .upsert_budget(user_id, category_id, &month_key(year, month), amount)
            .await
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<usize> {
        self.budget_repository.delete_budget(user_id, budget_id).await
    }
}

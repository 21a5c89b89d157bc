use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::transactions_model::*;
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Result, ValidationError};
use crate::goals::SavingsGoalRepositoryTrait;
use crate::utils::time_utils::month_bounds;

/// Service for the transaction ledger write and read paths.
pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    goal_repository: Arc<dyn SavingsGoalRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        goal_repository: Arc<dyn SavingsGoalRepositoryTrait>,
    ) -> Self {
        TransactionService {
            transaction_repository,
            category_repository,
            goal_repository,
        }
    }

    /// A transaction may only reference a live category of its own type:
    /// income categories cannot tag expense entries and vice versa.
    fn check_category(
        &self,
        user_id: &str,
        category_id: &str,
        transaction_type: TransactionType,
    ) -> Result<()> {
        let category = self.category_repository.get_category(user_id, category_id)?;
        if category.category_type != transaction_type.as_str() {
            return Err(ValidationError::InvalidInput(format!(
                "category '{}' is {}, not {}",
                category.name, category.category_type, transaction_type
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repository
            .get_transaction(user_id, transaction_id)
    }

    fn list_transactions(&self, user_id: &str, year: i32, month: u32) -> Result<Vec<Transaction>> {
        let (start, end) = month_bounds(year, month)?;
        self.transaction_repository
            .list_transactions(user_id, start, end)
    }

    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        let transaction_type: TransactionType = new_transaction.transaction_type.parse()?;
        if let Some(category_id) = &new_transaction.category_id {
            self.check_category(&new_transaction.user_id, category_id, transaction_type)?;
        }
        if let Some(goal_id) = &new_transaction.savings_goal_id {
            // Existence/ownership check; get_goal surfaces NotFound itself.
            self.goal_repository
                .get_goal(&new_transaction.user_id, goal_id)?;
        }

        debug!(
            "creating {} transaction of {} for user {}",
            transaction_type, new_transaction.amount, new_transaction.user_id
        );
        self.transaction_repository
            .create_transaction(new_transaction)
            .await
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repository
            .soft_delete_transaction(user_id, transaction_id)
            .await
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        if let Some(category_id) = &update.category_id {
            let existing = self
                .transaction_repository
                .get_transaction(user_id, transaction_id)?;
            self.check_category(user_id, category_id, existing.transaction_type)?;
        }
        self.transaction_repository
            .update_transaction(user_id, transaction_id, update)
            .await
    }
}

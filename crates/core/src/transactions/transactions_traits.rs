use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::transactions_model::*;
use crate::errors::Result;

/// Trait defining the contract for ledger repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>>;
    fn month_type_totals(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<MonthTypeTotals>;
    fn expense_totals_by_category(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CategoryExpenseTotal>>;
    fn savings_contributions(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<AmountWithCount>;
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn soft_delete_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
}

/// Trait defining the contract for ledger service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn list_transactions(&self, user_id: &str, year: i32, month: u32) -> Result<Vec<Transaction>>;
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
}

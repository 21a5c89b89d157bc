use async_trait::async_trait;
use chrono::NaiveDate;

use super::balances_model::DailyBalance;
use crate::errors::Result;

/// Trait defining the contract for daily balance repository operations.
#[async_trait]
pub trait DailyBalanceRepositoryTrait: Send + Sync {
    fn get_range(&self, user_id: &str, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<DailyBalance>>;
    async fn recompute(&self, user_id: &str, day: NaiveDate) -> Result<DailyBalance>;
    fn compute_month_from_ledger(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DailyBalance>>;
}

/// Trait defining the contract for daily balance service operations.
#[async_trait]
pub trait DailyBalanceServiceTrait: Send + Sync {
    async fn recompute_daily_balance(&self, user_id: &str, day: NaiveDate) -> Result<DailyBalance>;
    fn get_recent_daily_balances(&self, user_id: &str, days: i64) -> Result<Vec<DailyBalance>>;
    fn get_monthly_daily_balances(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DailyBalance>>;
}

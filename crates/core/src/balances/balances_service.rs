use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use log::debug;

use super::balances_model::DailyBalance;
use super::balances_traits::{DailyBalanceRepositoryTrait, DailyBalanceServiceTrait};
use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::month_bounds;

pub struct DailyBalanceService {
    balance_repository: Arc<dyn DailyBalanceRepositoryTrait>,
}

impl DailyBalanceService {
    pub fn new(balance_repository: Arc<dyn DailyBalanceRepositoryTrait>) -> Self {
        DailyBalanceService { balance_repository }
    }
}

#[async_trait]
impl DailyBalanceServiceTrait for DailyBalanceService {
    async fn recompute_daily_balance(&self, user_id: &str, day: NaiveDate) -> Result<DailyBalance> {
        self.balance_repository.recompute(user_id, day).await
    }

    fn get_recent_daily_balances(&self, user_id: &str, days: i64) -> Result<Vec<DailyBalance>> {
        if days <= 0 {
            return Err(ValidationError::InvalidInput(format!(
                "days must be positive, got {}",
                days
            ))
            .into());
        }
        let today = Utc::now().date_naive();
        let from = today
            .checked_sub_days(Days::new((days - 1) as u64))
            .unwrap_or(NaiveDate::MIN);
        self.balance_repository.get_range(user_id, from, today)
    }

    fn get_monthly_daily_balances(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DailyBalance>> {
        let (start, end) = month_bounds(year, month)?;
        let first = start.date();
        let last = end.date().pred_opt().unwrap_or(first);

        let snapshots = self.balance_repository.get_range(user_id, first, last)?;
        if !snapshots.is_empty() {
            return Ok(snapshots);
        }

        debug!(
            "no snapshot rows for user {} in {}-{:02}, computing from ledger",
            user_id, year, month
        );
        self.balance_repository
            .compute_month_from_ledger(user_id, year, month)
    }
}

use async_trait::async_trait;

use super::summary_model::MonthlySummary;
use crate::errors::Result;

/// Trait defining the contract for the monthly summary aggregator.
#[async_trait]
pub trait SummaryServiceTrait: Send + Sync {
    async fn get_monthly_summary(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlySummary>;
}

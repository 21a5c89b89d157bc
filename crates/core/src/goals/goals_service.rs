use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::goals_errors::GoalError;
use super::goals_model::{Deposit, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
use super::goals_traits::{SavingsGoalRepositoryTrait, SavingsGoalServiceTrait};
use crate::errors::{Result, ValidationError};

pub struct SavingsGoalService {
    goal_repository: Arc<dyn SavingsGoalRepositoryTrait>,
}

impl SavingsGoalService {
    pub fn new(goal_repository: Arc<dyn SavingsGoalRepositoryTrait>) -> Self {
        SavingsGoalService { goal_repository }
    }
}

#[async_trait]
impl SavingsGoalServiceTrait for SavingsGoalService {
    fn list_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        self.goal_repository.list_goals(user_id)
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        self.goal_repository.get_goal(user_id, goal_id)
    }

    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        new_goal.validate()?;
        self.goal_repository.create_goal(new_goal).await
    }

    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal> {
        if let Some(target_amount) = update.target_amount {
            if target_amount <= 0 {
                return Err(ValidationError::NonPositiveAmount(target_amount).into());
            }
        }
        if let Some(target_month) = update.target_month {
            if !(1..=12).contains(&target_month) {
                return Err(ValidationError::InvalidPeriod(target_month.to_string()).into());
            }
        }
        self.goal_repository
            .update_goal(user_id, goal_id, update)
            .await
    }

    async fn set_primary_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        is_primary: bool,
    ) -> Result<SavingsGoal> {
        debug!(
            "setting primary={} on goal {} for user {}",
            is_primary, goal_id, user_id
        );
        self.goal_repository
            .set_primary(user_id, goal_id, is_primary)
            .await
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        self.goal_repository.soft_delete_goal(user_id, goal_id).await
    }

    async fn deposit(&self, user_id: &str, goal_id: &str, amount: i64) -> Result<Deposit> {
        if amount <= 0 {
            return Err(GoalError::InvalidDeposit(amount).into());
        }

        let deposit = self.goal_repository.deposit(user_id, goal_id, amount).await?;
        info!(
            "deposited {} into goal {} for user {}, balance now {}",
            amount, goal_id, user_id, deposit.goal.current_amount
        );
        Ok(deposit)
    }
}

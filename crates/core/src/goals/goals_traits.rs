use async_trait::async_trait;

use super::goals_model::{Deposit, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
use crate::errors::Result;

/// Trait defining the contract for savings-goal repository operations.
#[async_trait]
pub trait SavingsGoalRepositoryTrait: Send + Sync {
    fn list_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>>;
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal>;
    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal>;
    async fn set_primary(
        &self,
        user_id: &str,
        goal_id: &str,
        is_primary: bool,
    ) -> Result<SavingsGoal>;
    async fn soft_delete_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal>;
    async fn deposit(&self, user_id: &str, goal_id: &str, amount: i64) -> Result<Deposit>;
}

/// Trait defining the contract for savings-goal service operations.
#[async_trait]
pub trait SavingsGoalServiceTrait: Send + Sync {
    fn list_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>>;
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal>;
    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal>;
    async fn set_primary_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        is_primary: bool,
    ) -> Result<SavingsGoal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal>;
    async fn deposit(&self, user_id: &str, goal_id: &str, amount: i64) -> Result<Deposit>;
}

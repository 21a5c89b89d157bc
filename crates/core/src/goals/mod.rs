pub mod goals_errors;
pub mod goals_model;
pub mod goals_repository;
pub mod goals_service;
pub mod goals_traits;

pub use goals_errors::GoalError;
pub use goals_model::{Deposit, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
pub use goals_repository::SavingsGoalRepository;
pub use goals_service::SavingsGoalService;
pub use goals_traits::{SavingsGoalRepositoryTrait, SavingsGoalServiceTrait};

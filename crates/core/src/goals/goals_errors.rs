use thiserror::Error;

use crate::errors::{Error, ValidationError};

/// Failure vocabulary of the savings-goal write paths.
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("Savings goal not found: {0}")]
    NotFound(String),
    #[error("Invalid deposit amount: {0}")]
    InvalidDeposit(i64),
}

impl From<GoalError> for Error {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::NotFound(id) => Error::NotFound(format!("savings goal {}", id)),
            GoalError::InvalidDeposit(amount) => {
                Error::Validation(ValidationError::NonPositiveAmount(amount))
            }
        }
    }
}

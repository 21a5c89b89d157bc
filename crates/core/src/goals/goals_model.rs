use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::transactions::Transaction;

/// A savings target. `current_amount` only moves through the deposit path
/// (or an explicit full-field correction); at most one live goal per user
/// carries `is_primary`.
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: i64,
    pub current_amount: i64,
    pub target_year: i32,
    pub target_month: i32,
    pub is_primary: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl SavingsGoal {
    /// A goal stays active until its target month has passed.
    pub fn is_active(&self, year: i32, month: u32) -> bool {
        (self.target_year, self.target_month) >= (year, month as i32)
    }
}

/// Input model for creating a savings goal
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub target_amount: i64,
    #[serde(default)]
    pub current_amount: i64,
    pub target_year: i32,
    pub target_month: i32,
    #[serde(default)]
    pub is_primary: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.target_amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(self.target_amount).into());
        }
        if self.current_amount < 0 {
            return Err(ValidationError::InvalidInput(format!(
                "current amount cannot be negative, got {}",
                self.current_amount
            ))
            .into());
        }
        if !(1..=12).contains(&self.target_month) {
            return Err(ValidationError::InvalidPeriod(format!(
                "{}-{}",
                self.target_year, self.target_month
            ))
            .into());
        }
        Ok(())
    }
}

/// Full-field update, covering manual current-amount corrections. Setting
/// `is_primary` to true demotes every other live goal of the user in the
/// same transaction.
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::savings_goals)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<i64>,
    pub current_amount: Option<i64>,
    pub target_year: Option<i32>,
    pub target_month: Option<i32>,
    pub is_primary: Option<bool>,
}

/// Result of a successful deposit: the advanced goal and the ledger entry
/// recording the contribution.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub goal: SavingsGoal,
    pub transaction: Transaction,
}

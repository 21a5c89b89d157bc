use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::parse_event_datetime;

/// Closed two-value kind of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing one money movement in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub savings_goal_id: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for ledger rows
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Insertable,
    AsChangeset,
    PartialEq,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub transaction_type: String,
    pub amount: i64,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub savings_goal_id: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        Ok(Transaction {
            transaction_type: db.transaction_type.parse()?,
            id: db.id,
            user_id: db.user_id,
            amount: db.amount,
            description: db.description,
            category_id: db.category_id,
            savings_goal_id: db.savings_goal_id,
            transaction_date: db.transaction_date.and_utc(),
            created_at: db.created_at.and_utc(),
            updated_at: db.updated_at.and_utc(),
        })
    }
}

/// Input model for creating a new ledger entry
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub user_id: String,
    pub transaction_type: String,
    pub amount: i64,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub savings_goal_id: Option<String>,
    pub transaction_date: String,
}

impl NewTransaction {
    /// Validates the new entry before anything is written.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        self.transaction_type.parse::<TransactionType>()?;
        if self.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(self.amount).into());
        }
        parse_event_datetime(&self.transaction_date)?;
        Ok(())
    }
}

/// Input model for editing a ledger entry. Only the description and the
/// category are editable; amount, type and date are append-only facts and
/// stay fixed. Both fields use replace semantics.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub category_id: Option<String>,
}

/// A sum together with the number of rows behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmountWithCount {
    pub total: i64,
    pub count: i64,
}

/// Month aggregates of plain (non-savings) ledger entries, split by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthTypeTotals {
    pub income: AmountWithCount,
    pub expense: AmountWithCount,
}

/// Per-category expense aggregate for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryExpenseTotal {
    pub category_id: Option<String>,
    pub total: i64,
    pub count: i64,
}

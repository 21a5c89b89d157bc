use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::transactions::TransactionType;

/// A named bucket transactions are grouped under. EXPENSE categories may
/// carry a default monthly budget that the aggregator materializes into an
/// explicit budget row the first time a month is queried.
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
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_type: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub default_budget: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// Input model for creating a category
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub category_type: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub default_budget: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        self.category_type.parse::<TransactionType>()?;
        if let Some(default_budget) = self.default_budget {
            if default_budget < 0 {
                return Err(ValidationError::InvalidInput(format!(
                    "default budget cannot be negative, got {}",
                    default_budget
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Input model for updating a category. `None` leaves a field unchanged;
/// `Some(None)` on the default budget clears it.
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub default_budget: Option<Option<i64>>,
}

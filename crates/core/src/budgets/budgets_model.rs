use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A per-month spending cap. `category_id` is `None` for the overall
/// monthly cap, `Some` for a per-category one. Rows come into existence
/// either explicitly or by the aggregator materializing a category's
/// default budget for the queried month.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub month: String,
    pub amount: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable row, built by the repository.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
pub struct NewBudget {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub month: String,
    pub amount: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

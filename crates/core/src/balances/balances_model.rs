use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One materialized snapshot row per (user, day): the day's income and
/// expense totals plus the cumulative balance of all transactions up to and
/// including that day. Derived state only; always rebuildable from the
/// ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBalance {
    pub user_id: String,
    pub date: NaiveDate,
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

/// Database model for daily balance snapshots, keyed on the natural
/// (user_id, balance_date) primary key.
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::daily_balances)]
#[diesel(primary_key(user_id, balance_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyBalanceDB {
    pub user_id: String,
    pub balance_date: NaiveDate,
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
    pub updated_at: NaiveDateTime,
}

impl From<DailyBalanceDB> for DailyBalance {
    fn from(db: DailyBalanceDB) -> Self {
        DailyBalance {
            user_id: db.user_id,
            date: db.balance_date,
            income: db.income,
            expense: db.expense,
            balance: db.balance,
        }
    }
}

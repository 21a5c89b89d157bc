use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::balances::balance_calculator;
use crate::balances::balances_model::{DailyBalance, DailyBalanceDB};
use crate::balances::balances_traits::DailyBalanceRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::schema::{daily_balances, transactions};
use crate::transactions::TransactionType;
use crate::utils::time_utils::{day_bounds, month_bounds};

/// Recomputes and upserts one (user, day) snapshot row on a borrowed
/// connection, so ledger mutations can run it inside their own transaction.
///
/// The cumulative balance is rebuilt from the full live history up to the
/// end of the target day rather than adjusted incrementally; re-running for
/// the same day is always convergent.
pub(crate) fn recompute_on_conn(
    conn: &mut SqliteConnection,
    user_id: &str,
    day: NaiveDate,
) -> Result<DailyBalance> {
    let (day_start, day_end) = day_bounds(day);

    let balance = signed_sum_before(conn, user_id, day_end)?;
    let (income, expense) = type_sums_between(conn, user_id, day_start, day_end)?;

    let row = DailyBalanceDB {
        user_id: user_id.to_string(),
        balance_date: day,
        income,
        expense,
        balance,
        updated_at: Utc::now().naive_utc(),
    };

    diesel::replace_into(daily_balances::table)
        .values(&row)
        .execute(conn)?;

    Ok(row.into())
}

/// Net of all live transactions strictly before `instant`
/// (income minus expense).
fn signed_sum_before(
    conn: &mut SqliteConnection,
    user_id: &str,
    instant: NaiveDateTime,
) -> Result<i64> {
    let rows: Vec<(String, Option<i64>)> = transactions::table
        .filter(transactions::user_id.eq(user_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::transaction_date.lt(instant))
        .group_by(transactions::transaction_type)
        .select((transactions::transaction_type, sum(transactions::amount)))
        .load(conn)?;

    let mut net = 0;
    for (transaction_type, total) in rows {
        match transaction_type.parse::<TransactionType>()? {
            TransactionType::Income => net += total.unwrap_or(0),
            TransactionType::Expense => net -= total.unwrap_or(0),
        }
    }
    Ok(net)
}

/// Income and expense totals of live transactions in `[start, end)`.
fn type_sums_between(
    conn: &mut SqliteConnection,
    user_id: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<(i64, i64)> {
    let rows: Vec<(String, Option<i64>)> = transactions::table
        .filter(transactions::user_id.eq(user_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::transaction_date.ge(start))
        .filter(transactions::transaction_date.lt(end))
        .group_by(transactions::transaction_type)
        .select((transactions::transaction_type, sum(transactions::amount)))
        .load(conn)?;

    let mut income = 0;
    let mut expense = 0;
    for (transaction_type, total) in rows {
        match transaction_type.parse::<TransactionType>()? {
            TransactionType::Income => income = total.unwrap_or(0),
            TransactionType::Expense => expense = total.unwrap_or(0),
        }
    }
    Ok((income, expense))
}

pub struct DailyBalanceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DailyBalanceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DailyBalanceRepository { pool, writer }
    }
}

#[async_trait::async_trait]
impl DailyBalanceRepositoryTrait for DailyBalanceRepository {
    fn get_range(&self, user_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyBalance>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_balances::table
            .filter(daily_balances::user_id.eq(user_id))
            .filter(daily_balances::balance_date.ge(from))
            .filter(daily_balances::balance_date.le(to))
            .order(daily_balances::balance_date.asc())
            .load::<DailyBalanceDB>(&mut conn)?;
        Ok(rows.into_iter().map(DailyBalance::from).collect())
    }

    async fn recompute(&self, user_id: &str, day: NaiveDate) -> Result<DailyBalance> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| recompute_on_conn(conn, &user_id, day))
            .await
    }

    /// Rebuilds a month of balance rows straight from the ledger without
    /// persisting anything: the fallback read path when no snapshot rows
    /// exist for the month.
    fn compute_month_from_ledger(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DailyBalance>> {
        let mut conn = get_connection(&self.pool)?;
        let (start, end) = month_bounds(year, month)?;

        let opening = signed_sum_before(&mut conn, user_id, start)?;

        let raw: Vec<(NaiveDateTime, String, i64)> = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::deleted_at.is_null())
            .filter(transactions::transaction_date.ge(start))
            .filter(transactions::transaction_date.lt(end))
            .order(transactions::transaction_date.asc())
            .select((
                transactions::transaction_date,
                transactions::transaction_type,
                transactions::amount,
            ))
            .load(&mut conn)?;

        let mut rows = Vec::with_capacity(raw.len());
        for (at, transaction_type, amount) in raw {
            rows.push((at, transaction_type.parse::<TransactionType>()?, amount));
        }

        let days = balance_calculator::group_by_day(&rows);
        Ok(balance_calculator::fold_daily_balances(
            user_id, opening, &days,
        ))
    }
}

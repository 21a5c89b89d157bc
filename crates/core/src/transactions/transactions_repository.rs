use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::balances::recompute_on_conn;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::schema::transactions;
use crate::transactions::transactions_model::*;
use crate::transactions::transactions_traits::TransactionRepositoryTrait;
use crate::utils::time_utils::parse_event_datetime;

/// Repository for the transaction ledger. Reads come straight from the
/// pool; every mutation runs as one write-actor job so the ledger row and
/// the affected day's snapshot commit or roll back together.
pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TransactionRepository { pool, writer }
    }
}

fn load_live(
    conn: &mut SqliteConnection,
    user_id: &str,
    transaction_id: &str,
) -> Result<TransactionDB> {
    Ok(transactions::table
        .filter(transactions::id.eq(transaction_id))
        .filter(transactions::user_id.eq(user_id))
        .filter(transactions::deleted_at.is_null())
        .first::<TransactionDB>(conn)?)
}

#[async_trait::async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        load_live(&mut conn, user_id, transaction_id)?.try_into()
    }

    fn list_transactions(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::deleted_at.is_null())
            .filter(transactions::transaction_date.ge(start))
            .filter(transactions::transaction_date.lt(end))
            .order(transactions::transaction_date.desc())
            .load::<TransactionDB>(&mut conn)?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Income/expense sums and counts over the range. Savings contributions
    /// are excluded here; they are reported separately.
    fn month_type_totals(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<MonthTypeTotals> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(String, Option<i64>, i64)> = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::deleted_at.is_null())
            .filter(transactions::savings_goal_id.is_null())
            .filter(transactions::transaction_date.ge(start))
            .filter(transactions::transaction_date.lt(end))
            .group_by(transactions::transaction_type)
            .select((
                transactions::transaction_type,
                sum(transactions::amount),
                count_star(),
            ))
            .load(&mut conn)?;

        let mut totals = MonthTypeTotals::default();
        for (transaction_type, total, count) in rows {
            let bucket = AmountWithCount {
                total: total.unwrap_or(0),
                count,
            };
            match transaction_type.parse::<TransactionType>()? {
                TransactionType::Income => totals.income = bucket,
                TransactionType::Expense => totals.expense = bucket,
            }
        }
        Ok(totals)
    }

    fn expense_totals_by_category(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CategoryExpenseTotal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(Option<String>, Option<i64>, i64)> = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::deleted_at.is_null())
            .filter(transactions::savings_goal_id.is_null())
            .filter(transactions::transaction_type.eq(TransactionType::Expense.as_str()))
            .filter(transactions::transaction_date.ge(start))
            .filter(transactions::transaction_date.lt(end))
            .group_by(transactions::category_id)
            .select((
                transactions::category_id,
                sum(transactions::amount),
                count_star(),
            ))
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(category_id, total, count)| CategoryExpenseTotal {
                category_id,
                total: total.unwrap_or(0),
                count,
            })
            .collect())
    }

    /// Sum and count of this range's savings contributions (ledger rows
    /// linked to a goal).
    fn savings_contributions(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<AmountWithCount> {
        let mut conn = get_connection(&self.pool)?;
        let (total, count): (Option<i64>, i64) = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::deleted_at.is_null())
            .filter(transactions::savings_goal_id.is_not_null())
            .filter(transactions::transaction_date.ge(start))
            .filter(transactions::transaction_date.lt(end))
            .select((sum(transactions::amount), count_star()))
            .first(&mut conn)?;
        Ok(AmountWithCount {
            total: total.unwrap_or(0),
            count,
        })
    }

    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let now = Utc::now().naive_utc();
                let occurred_at = parse_event_datetime(&new_transaction.transaction_date)?;

                let row = TransactionDB {
                    id: new_transaction
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id: new_transaction.user_id,
                    transaction_type: new_transaction.transaction_type,
                    amount: new_transaction.amount,
                    description: new_transaction.description,
                    category_id: new_transaction.category_id,
                    savings_goal_id: new_transaction.savings_goal_id,
                    transaction_date: occurred_at,
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };

                diesel::insert_into(transactions::table)
                    .values(&row)
                    .execute(conn)?;

                recompute_on_conn(conn, &row.user_id, occurred_at.date())?;

                row.try_into()
            })
            .await
    }

    async fn soft_delete_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let existing = load_live(conn, &user_id, &transaction_id)?;

                let now = Utc::now().naive_utc();
                diesel::update(transactions::table.find(&existing.id))
                    .set((
                        transactions::deleted_at.eq(now),
                        transactions::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                // Only the deleted entry's own day is refreshed here; later
                // snapshot days are the reconciliation path's job.
                recompute_on_conn(conn, &user_id, existing.transaction_date.date())?;

                existing.try_into()
            })
            .await
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let existing = load_live(conn, &user_id, &transaction_id)?;

                diesel::update(transactions::table.find(&existing.id))
                    .set((
                        transactions::description.eq(update.description),
                        transactions::category_id.eq(update.category_id),
                        transactions::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                load_live(conn, &user_id, &transaction_id)?.try_into()
            })
            .await
    }
}

use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::budgets::budgets_model::{Budget, NewBudget};
use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{Error, Result};
use crate::schema::{budgets, categories};
use crate::transactions::TransactionType;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BudgetRepository { pool, writer }
    }
}

#[async_trait::async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn list_budgets(&self, user_id: &str, month: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::month.eq(month))
            .load::<Budget>(&mut conn)?)
    }

    /// Sets or replaces the cap for (user, category-or-overall, month).
    /// Both shapes go through a constraint-backed upsert against their
    /// partial unique index, so concurrent duplicate calls converge.
    async fn upsert_budget(
        &self,
        user_id: &str,
        category_id: Option<String>,
        month: &str,
        amount: i64,
    ) -> Result<Budget> {
        let user_id = user_id.to_string();
        let month = month.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let now = Utc::now().naive_utc();
                let row = NewBudget {
                    id: Uuid::new_v4().to_string(),
                    user_id: user_id.clone(),
                    category_id: category_id.clone(),
                    month: month.clone(),
                    amount,
                    created_at: now,
                    updated_at: now,
                };

                match &category_id {
                    Some(target_category) => {
                        diesel::insert_into(budgets::table)
                            .values(&row)
                            .on_conflict((budgets::user_id, budgets::category_id, budgets::month))
                            .filter_target(budgets::category_id.is_not_null())
                            .do_update()
                            .set((budgets::amount.eq(amount), budgets::updated_at.eq(now)))
                            .execute(conn)?;

                        Ok(budgets::table
                            .filter(budgets::user_id.eq(&user_id))
                            .filter(budgets::category_id.eq(target_category))
                            .filter(budgets::month.eq(&month))
                            .first::<Budget>(conn)?)
                    }
                    None => {
                        diesel::insert_into(budgets::table)
                            .values(&row)
                            .on_conflict((budgets::user_id, budgets::month))
                            .filter_target(budgets::category_id.is_null())
                            .do_update()
                            .set((budgets::amount.eq(amount), budgets::updated_at.eq(now)))
                            .execute(conn)?;

                        Ok(budgets::table
                            .filter(budgets::user_id.eq(&user_id))
                            .filter(budgets::category_id.is_null())
                            .filter(budgets::month.eq(&month))
                            .first::<Budget>(conn)?)
                    }
                }
            })
            .await
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = diesel::delete(
                    budgets::table
                        .filter(budgets::id.eq(&budget_id))
                        .filter(budgets::user_id.eq(&user_id)),
                )
                .execute(conn)?;

                if deleted == 0 {
                    return Err(Error::NotFound(format!("budget {}", budget_id)));
                }
                Ok(deleted)
            })
            .await
    }

    /// Materializes a budget row for every live EXPENSE category that has a
    /// default budget and no explicit row for the month yet, so caps carry
    /// forward month to month without user action. `ON CONFLICT DO NOTHING`
    /// keeps concurrent duplicate calls from creating duplicates.
    async fn ensure_default_budgets(&self, user_id: &str, month: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let month = month.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let defaults: Vec<(String, i64)> = categories::table
                    .filter(categories::user_id.eq(&user_id))
                    .filter(categories::deleted_at.is_null())
                    .filter(categories::category_type.eq(TransactionType::Expense.as_str()))
                    .filter(categories::default_budget.is_not_null())
                    .select((
                        categories::id,
                        categories::default_budget.assume_not_null(),
                    ))
                    .load(conn)?;

                let now = Utc::now().naive_utc();
                let mut created = 0;
                for (category_id, amount) in defaults {
                    let row = NewBudget {
                        id: Uuid::new_v4().to_string(),
                        user_id: user_id.clone(),
                        category_id: Some(category_id),
                        month: month.clone(),
                        amount,
                        created_at: now,
                        updated_at: now,
                    };
                    created += diesel::insert_into(budgets::table)
                        .values(&row)
                        .on_conflict((budgets::user_id, budgets::category_id, budgets::month))
                        .filter_target(budgets::category_id.is_not_null())
                        .do_nothing()
                        .execute(conn)?;
                }

                Ok(created)
            })
            .await
    }
}

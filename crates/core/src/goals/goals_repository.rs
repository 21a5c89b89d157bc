use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::balances::recompute_on_conn;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::goals::goals_model::{Deposit, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
use crate::goals::goals_traits::SavingsGoalRepositoryTrait;
use crate::schema::{savings_goals, transactions};
use crate::transactions::{Transaction, TransactionDB, TransactionType};

pub struct SavingsGoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SavingsGoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SavingsGoalRepository { pool, writer }
    }
}

fn load_live(conn: &mut SqliteConnection, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
    Ok(savings_goals::table
        .filter(savings_goals::id.eq(goal_id))
        .filter(savings_goals::user_id.eq(user_id))
        .filter(savings_goals::deleted_at.is_null())
        .first::<SavingsGoal>(conn)?)
}

/// Demotes every live goal of the user except `keep_id`. Excluding the kept
/// goal means a reader mid-sequence never observes zero primaries followed
/// by two.
fn clear_other_primaries(
    conn: &mut SqliteConnection,
    user_id: &str,
    keep_id: &str,
) -> Result<usize> {
    Ok(diesel::update(
        savings_goals::table
            .filter(savings_goals::user_id.eq(user_id))
            .filter(savings_goals::id.ne(keep_id))
            .filter(savings_goals::deleted_at.is_null())
            .filter(savings_goals::is_primary.eq(true)),
    )
    .set(savings_goals::is_primary.eq(false))
    .execute(conn)?)
}

#[async_trait::async_trait]
impl SavingsGoalRepositoryTrait for SavingsGoalRepository {
    fn list_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(savings_goals::table
            .filter(savings_goals::user_id.eq(user_id))
            .filter(savings_goals::deleted_at.is_null())
            .order(savings_goals::created_at.asc())
            .load::<SavingsGoal>(&mut conn)?)
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        let mut conn = get_connection(&self.pool)?;
        load_live(&mut conn, user_id, goal_id)
    }

    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let mut goal = new_goal;
                let now = Utc::now().naive_utc();
                let goal_id = goal.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                goal.id = Some(goal_id.clone());
                goal.created_at = Some(now);
                goal.updated_at = Some(now);

                if goal.is_primary {
                    clear_other_primaries(conn, &goal.user_id, &goal_id)?;
                }

                diesel::insert_into(savings_goals::table)
                    .values(&goal)
                    .execute(conn)?;

                Ok(savings_goals::table
                    .find(&goal_id)
                    .first::<SavingsGoal>(conn)?)
            })
            .await
    }

    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let existing = load_live(conn, &user_id, &goal_id)?;

                if update.is_primary == Some(true) {
                    clear_other_primaries(conn, &user_id, &existing.id)?;
                }

                diesel::update(savings_goals::table.find(&existing.id))
                    .set((
                        &update,
                        savings_goals::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                load_live(conn, &user_id, &goal_id)
            })
            .await
    }

    async fn set_primary(
        &self,
        user_id: &str,
        goal_id: &str,
        is_primary: bool,
    ) -> Result<SavingsGoal> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let existing = load_live(conn, &user_id, &goal_id)?;

                if is_primary {
                    clear_other_primaries(conn, &user_id, &existing.id)?;
                }

                diesel::update(savings_goals::table.find(&existing.id))
                    .set((
                        savings_goals::is_primary.eq(is_primary),
                        savings_goals::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                load_live(conn, &user_id, &goal_id)
            })
            .await
    }

    async fn soft_delete_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let existing = load_live(conn, &user_id, &goal_id)?;

                let now = Utc::now().naive_utc();
                diesel::update(savings_goals::table.find(&existing.id))
                    .set((
                        savings_goals::deleted_at.eq(now),
                        savings_goals::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                Ok(savings_goals::table
                    .find(&existing.id)
                    .first::<SavingsGoal>(conn)?)
            })
            .await
    }

    /// The deposit triple-update: advance the goal, record the ledger
    /// entry, refresh today's snapshot. One write-actor job, so either all
    /// three land or none do.
    async fn deposit(&self, user_id: &str, goal_id: &str, amount: i64) -> Result<Deposit> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Deposit> {
                let goal = load_live(conn, &user_id, &goal_id)?;

                let now = Utc::now().naive_utc();
                diesel::update(savings_goals::table.find(&goal.id))
                    .set((
                        savings_goals::current_amount
                            .eq(savings_goals::current_amount + amount),
                        savings_goals::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                let entry = TransactionDB {
                    id: Uuid::new_v4().to_string(),
                    user_id: user_id.clone(),
                    transaction_type: TransactionType::Expense.as_str().to_string(),
                    amount,
                    description: Some(format!("Deposit to {}", goal.name)),
                    category_id: None,
                    savings_goal_id: Some(goal.id.clone()),
                    transaction_date: now,
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };
                diesel::insert_into(transactions::table)
                    .values(&entry)
                    .execute(conn)?;

                recompute_on_conn(conn, &user_id, now.date())?;

                let goal = load_live(conn, &user_id, &goal_id)?;
                let transaction = Transaction::try_from(entry)?;
                Ok(Deposit { goal, transaction })
            })
            .await
    }
}

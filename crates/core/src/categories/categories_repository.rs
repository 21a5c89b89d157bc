use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::categories::categories_model::{Category, CategoryUpdate, NewCategory};
use crate::categories::categories_traits::CategoryRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::schema::categories;
use crate::transactions::TransactionType;

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        CategoryRepository { pool, writer }
    }
}

fn load_live(conn: &mut SqliteConnection, user_id: &str, category_id: &str) -> Result<Category> {
    Ok(categories::table
        .filter(categories::id.eq(category_id))
        .filter(categories::user_id.eq(user_id))
        .filter(categories::deleted_at.is_null())
        .first::<Category>(conn)?)
}

#[async_trait::async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn list_categories(
        &self,
        user_id: &str,
        type_filter: Option<TransactionType>,
    ) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::deleted_at.is_null())
            .into_boxed();

        if let Some(category_type) = type_filter {
            query = query.filter(categories::category_type.eq(category_type.as_str()));
        }

        Ok(query
            .order((categories::category_type.asc(), categories::name.asc()))
            .load::<Category>(&mut conn)?)
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        load_live(&mut conn, user_id, category_id)
    }

    /// Lookup by id without the soft-delete filter; summary rows keep
    /// resolving names of categories deleted after the fact.
    fn get_categories_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::id.eq_any(ids))
            .load::<Category>(&mut conn)?)
    }

    async fn create_category(&self, new_category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let mut category = new_category;
                let now = Utc::now().naive_utc();
                if category.id.is_none() {
                    category.id = Some(Uuid::new_v4().to_string());
                }
                category.created_at = Some(now);
                category.updated_at = Some(now);

                // A live duplicate of (user, name, type) trips the partial
                // unique index and surfaces as Conflict.
                diesel::insert_into(categories::table)
                    .values(&category)
                    .execute(conn)?;

                Ok(categories::table
                    .find(category.id.unwrap_or_default())
                    .first::<Category>(conn)?)
            })
            .await
    }

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let existing = load_live(conn, &user_id, &category_id)?;

                diesel::update(categories::table.find(&existing.id))
                    .set((
                        &update,
                        categories::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                load_live(conn, &user_id, &category_id)
            })
            .await
    }

    async fn soft_delete_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let existing = load_live(conn, &user_id, &category_id)?;

                let now = Utc::now().naive_utc();
                diesel::update(categories::table.find(&existing.id))
                    .set((
                        categories::deleted_at.eq(now),
                        categories::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                Ok(categories::table
                    .find(&existing.id)
                    .first::<Category>(conn)?)
            })
            .await
    }
}

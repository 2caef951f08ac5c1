//! PostgreSQL-backed `CategoryRepository`.
//!
//! Deletion relies on `topics_category_id_fkey` being `ON DELETE RESTRICT`: a
//! topic filed under the category after the service counted is reported as
//! [`CategoryRepositoryError::InUse`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryId, CategoryName};

use super::diesel_error_mapping::{DbFailure, TOPICS_CATEGORY_FK};
use super::models::{CategoryChanges, CategoryRow};
use super::pool::DbPool;
use super::schema::categories;

#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for CategoryRepositoryError {
    fn from(failure: DbFailure) -> Self {
        if failure.violates(TOPICS_CATEGORY_FK) {
            return Self::in_use();
        }
        match failure {
            DbFailure::Connection(message) => Self::connection(message),
            other => Self::query(other.into_message()),
        }
    }
}

fn into_category(row: CategoryRow) -> Result<Category, CategoryRepositoryError> {
    Category::try_from(row).map_err(|err| DbFailure::from(err).into())
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn insert(&self, category: &Category) -> Result<(), CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        diesel::insert_into(categories::table)
            .values(CategoryChanges::from(category))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let row = categories::table
            .find(*id.as_uuid())
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DbFailure::from)?;
        row.map(into_category).transpose()
    }

    async fn find_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let row = categories::table
            .filter(categories::name.eq(name.as_str()))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DbFailure::from)?;
        row.map(into_category).transpose()
    }

    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let rows = categories::table
            .order((categories::name.asc(), categories::id.asc()))
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        rows.into_iter().map(into_category).collect()
    }

    async fn update(&self, category: &Category) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let updated = diesel::update(categories::table.find(*category.id.as_uuid()))
            .set(CategoryChanges::from(category))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let deleted = diesel::delete(categories::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(deleted > 0)
    }
}

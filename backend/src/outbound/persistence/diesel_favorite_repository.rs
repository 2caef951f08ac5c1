//! PostgreSQL-backed `FavoriteRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FavoriteRepository, FavoriteRepositoryError};
use crate::domain::{Favorite, FavoriteId, TopicId, UserId};

use super::diesel_error_mapping::{DbFailure, FAVORITES_TOPIC_FK, FAVORITES_USER_FK};
use super::models::{FavoriteRow, count_from_db};
use super::pool::DbPool;
use super::schema::favorites;

const FAVORITES_UNIQUE_PAIR: &str = "favorites_user_id_topic_id_key";

#[derive(Clone)]
pub struct DieselFavoriteRepository {
    pool: DbPool,
}

impl DieselFavoriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for FavoriteRepositoryError {
    fn from(failure: DbFailure) -> Self {
        if failure.violates(FAVORITES_TOPIC_FK) {
            return Self::topic_not_found();
        }
        if failure.violates(FAVORITES_USER_FK) {
            return Self::user_not_found();
        }
        match failure {
            DbFailure::UniqueViolation { constraint }
                if constraint
                    .as_deref()
                    .is_none_or(|name| name == FAVORITES_UNIQUE_PAIR) =>
            {
                Self::duplicate_favorite()
            }
            DbFailure::Connection(message) => Self::connection(message),
            other => Self::query(other.into_message()),
        }
    }
}

#[async_trait]
impl FavoriteRepository for DieselFavoriteRepository {
    async fn find_for(
        &self,
        user_id: &UserId,
        topic_id: &TopicId,
    ) -> Result<Option<Favorite>, FavoriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let row = favorites::table
            .filter(favorites::user_id.eq(*user_id.as_uuid()))
            .filter(favorites::topic_id.eq(*topic_id.as_uuid()))
            .select(FavoriteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DbFailure::from)?;
        Ok(row.map(Favorite::from))
    }

    async fn insert(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        diesel::insert_into(favorites::table)
            .values(FavoriteRow::from(favorite))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(())
    }

    async fn delete(&self, id: &FavoriteId) -> Result<bool, FavoriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let deleted = diesel::delete(favorites::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(deleted > 0)
    }

    async fn count_for_topic(&self, topic_id: &TopicId) -> Result<u64, FavoriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let count: i64 = favorites::table
            .filter(favorites::topic_id.eq(*topic_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(count_from_db(count))
    }

    async fn topic_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TopicId>, FavoriteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let ids: Vec<Uuid> = favorites::table
            .filter(favorites::user_id.eq(*user_id.as_uuid()))
            .order((favorites::created_at.desc(), favorites::id.desc()))
            .select(favorites::topic_id)
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(ids.into_iter().map(TopicId::from_uuid).collect())
    }
}

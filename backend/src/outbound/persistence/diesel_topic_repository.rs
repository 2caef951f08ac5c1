//! PostgreSQL-backed `TopicRepository`.
//!
//! Reads join `users` and `categories` so records carry display names.
//! Updates are conditional on the stored revision; when no row matches the
//! adapter re-reads the revision to tell a stale write from a vanished topic.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TopicRepository, TopicRepositoryError};
use crate::domain::{CategoryId, Topic, TopicId, TopicRecord};

use super::diesel_error_mapping::{DbFailure, TOPICS_CATEGORY_FK};
use super::models::{
    NewTopicRow, TopicChanges, TopicJoinRow, TopicRow, count_from_db, revision_for_db,
    revision_from_db, topic_record_from_row,
};
use super::pool::DbPool;
use super::schema::{categories, topics, users};

#[derive(Clone)]
pub struct DieselTopicRepository {
    pool: DbPool,
}

impl DieselTopicRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for TopicRepositoryError {
    fn from(failure: DbFailure) -> Self {
        if failure.violates(TOPICS_CATEGORY_FK) {
            return Self::category_not_found();
        }
        match failure {
            DbFailure::Connection(message) => Self::connection(message),
            other => Self::query(other.into_message()),
        }
    }
}

/// Topics joined with their author names and optional category name.
macro_rules! joined_topics {
    () => {
        topics::table
            .inner_join(users::table)
            .left_join(categories::table)
            .select((
                TopicRow::as_select(),
                (users::first_name, users::last_name),
                categories::name.nullable(),
            ))
    };
}

fn into_records(rows: Vec<TopicJoinRow>) -> Result<Vec<TopicRecord>, TopicRepositoryError> {
    rows.into_iter()
        .map(|row| topic_record_from_row(row).map_err(|err| DbFailure::from(err).into()))
        .collect()
}

/// Explain why a revision-guarded update touched no rows.
async fn missed_update(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    expected: u32,
) -> TopicRepositoryError {
    let stored = topics::table
        .find(id)
        .select(topics::revision)
        .first::<i32>(conn)
        .await
        .optional();

    match stored {
        Ok(None) => TopicRepositoryError::not_found(),
        Ok(Some(actual)) => match revision_from_db(actual) {
            Ok(actual) => TopicRepositoryError::revision_mismatch(expected, actual),
            Err(err) => DbFailure::from(err).into(),
        },
        Err(err) => DbFailure::from(err).into(),
    }
}

#[async_trait]
impl TopicRepository for DieselTopicRepository {
    async fn insert(&self, topic: &Topic) -> Result<(), TopicRepositoryError> {
        let row = NewTopicRow::from_topic(topic).map_err(DbFailure::from)?;
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        diesel::insert_into(topics::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(())
    }

    async fn find_record(&self, id: &TopicId) -> Result<Option<TopicRecord>, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let row: Option<TopicJoinRow> = joined_topics!()
            .filter(topics::id.eq(*id.as_uuid()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(DbFailure::from)?;

        Ok(into_records(row.into_iter().collect())?.pop())
    }

    async fn list_records(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<TopicRecord>, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let mut query = joined_topics!()
            .order((topics::created_at.desc(), topics::id.desc()))
            .into_boxed();
        if let Some(category_id) = category_id {
            query = query.filter(topics::category_id.eq(*category_id.as_uuid()));
        }

        let rows: Vec<TopicJoinRow> = query.load(&mut conn).await.map_err(DbFailure::from)?;
        into_records(rows)
    }

    async fn find_records(
        &self,
        ids: &[TopicId],
    ) -> Result<Vec<TopicRecord>, TopicRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let rows: Vec<TopicJoinRow> = joined_topics!()
            .filter(topics::id.eq_any(uuids))
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        into_records(rows)
    }

    async fn update(
        &self,
        topic: &Topic,
        expected_revision: u32,
    ) -> Result<(), TopicRepositoryError> {
        let changes = TopicChanges::from_topic(topic).map_err(DbFailure::from)?;
        let expected = revision_for_db(expected_revision).map_err(DbFailure::from)?;
        let id = *topic.id.as_uuid();
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let updated = diesel::update(
            topics::table
                .filter(topics::id.eq(id))
                .filter(topics::revision.eq(expected)),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(DbFailure::from)?;

        if updated == 0 {
            return Err(missed_update(&mut conn, id, expected_revision).await);
        }
        Ok(())
    }

    async fn delete(&self, id: &TopicId) -> Result<bool, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let deleted = diesel::delete(topics::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(deleted > 0)
    }

    async fn count_in_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<u64, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let count: i64 = topics::table
            .filter(topics::category_id.eq(*category_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(count_from_db(count))
    }

    async fn count_by_category(&self) -> Result<HashMap<CategoryId, u64>, TopicRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let rows: Vec<(Option<Uuid>, i64)> = topics::table
            .filter(topics::category_id.is_not_null())
            .group_by(topics::category_id)
            .select((topics::category_id, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (CategoryId::from_uuid(id), count_from_db(count))))
            .collect())
    }
}

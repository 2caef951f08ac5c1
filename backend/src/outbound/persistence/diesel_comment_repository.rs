//! PostgreSQL-backed `CommentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentRecord, TopicId};

use super::diesel_error_mapping::{COMMENTS_TOPIC_FK, DbFailure};
use super::models::{CommentRow, NewCommentRow, comment_record_from_row};
use super::pool::DbPool;
use super::schema::{comments, users};

#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for CommentRepositoryError {
    fn from(failure: DbFailure) -> Self {
        if failure.violates(COMMENTS_TOPIC_FK) {
            return Self::topic_not_found();
        }
        match failure {
            DbFailure::Connection(message) => Self::connection(message),
            other => Self::query(other.into_message()),
        }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        diesel::insert_into(comments::table)
            .values(NewCommentRow::from(comment))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(())
    }

    async fn list_for_topic(
        &self,
        topic_id: &TopicId,
    ) -> Result<Vec<CommentRecord>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let rows: Vec<(CommentRow, (String, String))> = comments::table
            .inner_join(users::table)
            .filter(comments::topic_id.eq(*topic_id.as_uuid()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), (users::first_name, users::last_name)))
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;

        rows.into_iter()
            .map(|row| comment_record_from_row(row).map_err(|err| DbFailure::from(err).into()))
            .collect()
    }
}

//! Driven port for topic persistence.
//!
//! Reads return [`TopicRecord`]s so list and detail views get the author and
//! category names in the same round trip. Updates are guarded by the topic
//! revision: an adapter only writes when the stored revision still equals
//! `expected_revision`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{CategoryId, Topic, TopicId, TopicRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by topic repository adapters.
    pub enum TopicRepositoryError {
        Connection { message: String } => "topic repository connection failed: {message}",
        Query { message: String } => "topic repository query failed: {message}",
        /// The category foreign key did not match a row.
        CategoryNotFound => "referenced category does not exist",
        /// The row changed since it was read.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The row vanished before it could be written.
        NotFound => "topic not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn insert(&self, topic: &Topic) -> Result<(), TopicRepositoryError>;

    async fn find_record(&self, id: &TopicId) -> Result<Option<TopicRecord>, TopicRepositoryError>;

    /// Newest first, optionally restricted to one category.
    async fn list_records(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<TopicRecord>, TopicRepositoryError>;

    /// Records for the given ids, in no particular order; unknown ids are
    /// skipped.
    async fn find_records(
        &self,
        ids: &[TopicId],
    ) -> Result<Vec<TopicRecord>, TopicRepositoryError>;

    /// Store `topic` if the current revision equals `expected_revision`.
    ///
    /// Fails with [`TopicRepositoryError::RevisionMismatch`] when the row has
    /// moved on and [`TopicRepositoryError::NotFound`] when it is gone.
    async fn update(&self, topic: &Topic, expected_revision: u32)
    -> Result<(), TopicRepositoryError>;

    /// Remove the topic and, by cascade, its comments, votes and favorites.
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &TopicId) -> Result<bool, TopicRepositoryError>;

    async fn count_in_category(&self, category_id: &CategoryId)
    -> Result<u64, TopicRepositoryError>;

    /// Topic counts keyed by category; categories without topics are absent.
    async fn count_by_category(&self) -> Result<HashMap<CategoryId, u64>, TopicRepositoryError>;
}

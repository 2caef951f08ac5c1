//! Driven port for favorite persistence.
//!
//! Adapters enforce uniqueness on `(user_id, topic_id)` and report a
//! violation as [`FavoriteRepositoryError::DuplicateFavorite`].

use async_trait::async_trait;

use crate::domain::{Favorite, FavoriteId, TopicId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by favorite repository adapters.
    pub enum FavoriteRepositoryError {
        Connection { message: String } => "favorite repository connection failed: {message}",
        Query { message: String } => "favorite repository query failed: {message}",
        DuplicateFavorite => "topic is already a favorite of this user",
        TopicNotFound => "topic not found",
        UserNotFound => "favoriting user does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn find_for(
        &self,
        user_id: &UserId,
        topic_id: &TopicId,
    ) -> Result<Option<Favorite>, FavoriteRepositoryError>;

    async fn insert(&self, favorite: &Favorite) -> Result<(), FavoriteRepositoryError>;

    /// Returns `false` when the row was already gone.
    async fn delete(&self, id: &FavoriteId) -> Result<bool, FavoriteRepositoryError>;

    async fn count_for_topic(&self, topic_id: &TopicId) -> Result<u64, FavoriteRepositoryError>;

    /// Topics the user bookmarked, most recent first.
    async fn topic_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TopicId>, FavoriteRepositoryError>;
}

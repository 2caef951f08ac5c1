//! Driving port for bookmarking topics.

use async_trait::async_trait;

use crate::domain::{Error, FavoriteToggle, TopicId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesCommand: Send + Sync {
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        topic_id: &TopicId,
    ) -> Result<FavoriteToggle, Error>;
}

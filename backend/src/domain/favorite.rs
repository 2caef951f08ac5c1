//! Bookmarked topics.

use chrono::{DateTime, Utc};

use super::{FavoriteId, TopicId, UserId};

/// At most one exists per `(user, topic)`; toggling creates or deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub topic_id: TopicId,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: UserId, topic_id: TopicId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: FavoriteId::random(),
            user_id,
            topic_id,
            created_at,
        }
    }
}

/// State of the pair after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub is_favorited: bool,
}

//! Favorite toggle.
//!
//! Looks the pair up and deletes the row if present, otherwise inserts one.
//! When two toggles race, the uniqueness constraint rejects the second
//! insert; the pair is then favorited, which is what both callers asked for.
//! A delete that finds the row already gone likewise leaves the pair
//! unfavorited.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::port_errors::map_favorite_error;
use super::ports::{FavoriteRepository, FavoriteRepositoryError, FavoritesCommand};
use super::{Error, Favorite, FavoriteToggle, TopicId, UserId};

#[derive(Clone)]
pub struct FavoriteService<F> {
    favorites: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<F> FavoriteService<F> {
    pub fn new(favorites: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self { favorites, clock }
    }
}

#[async_trait]
impl<F> FavoritesCommand for FavoriteService<F>
where
    F: FavoriteRepository,
{
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        topic_id: &TopicId,
    ) -> Result<FavoriteToggle, Error> {
        let existing = self
            .favorites
            .find_for(user_id, topic_id)
            .await
            .map_err(map_favorite_error)?;

        if let Some(favorite) = existing {
            let removed = self
                .favorites
                .delete(&favorite.id)
                .await
                .map_err(map_favorite_error)?;
            if !removed {
                debug!(%user_id, %topic_id, "favorite already removed by a concurrent toggle");
            }
            return Ok(FavoriteToggle {
                is_favorited: false,
            });
        }

        let favorite = Favorite::new(*user_id, *topic_id, self.clock.utc());
        match self.favorites.insert(&favorite).await {
            Ok(()) => {}
            Err(FavoriteRepositoryError::DuplicateFavorite) => {
                debug!(%user_id, %topic_id, "favorite already created by a concurrent toggle");
            }
            Err(err) => return Err(map_favorite_error(err)),
        }
        Ok(FavoriteToggle { is_favorited: true })
    }
}

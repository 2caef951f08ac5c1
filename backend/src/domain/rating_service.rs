//! Rating engine.
//!
//! A rating is looked up by `(topic, user)`. An existing vote is overwritten
//! in place; otherwise a new one is inserted. The store's uniqueness
//! constraint decides races between two first votes from the same user: the
//! losing insert fails with `DuplicateVote` and is retried once as an update.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::port_errors::{map_vote_error, topic_not_found};
use super::ports::{RatingCommand, VoteRepository, VoteRepositoryError};
use super::{Error, RateTopicRequest, RatingTally, TopicId, UserId, Vote};

#[derive(Clone)]
pub struct RatingService<V> {
    votes: Arc<V>,
}

impl<V> RatingService<V> {
    pub fn new(votes: Arc<V>) -> Self {
        Self { votes }
    }
}

impl<V> RatingService<V>
where
    V: VoteRepository,
{
    async fn overwrite(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
        is_liked: bool,
    ) -> Result<(), Error> {
        let updated = self
            .votes
            .set_liked(topic_id, user_id, is_liked)
            .await
            .map_err(map_vote_error)?;
        if updated {
            Ok(())
        } else {
            // Votes are only removed by the topic cascade.
            Err(topic_not_found())
        }
    }

    async fn record_vote(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
        is_liked: bool,
    ) -> Result<(), Error> {
        let existing = self
            .votes
            .find_for(topic_id, user_id)
            .await
            .map_err(map_vote_error)?;
        if existing.is_some() {
            return self.overwrite(topic_id, user_id, is_liked).await;
        }

        match self.votes.insert(&Vote::new(*topic_id, *user_id, is_liked)).await {
            Ok(()) => Ok(()),
            Err(VoteRepositoryError::DuplicateVote) => {
                debug!(%topic_id, %user_id, "concurrent first vote detected; retrying as update");
                self.overwrite(topic_id, user_id, is_liked).await
            }
            Err(err) => Err(map_vote_error(err)),
        }
    }
}

#[async_trait]
impl<V> RatingCommand for RatingService<V>
where
    V: VoteRepository,
{
    async fn rate(&self, request: RateTopicRequest) -> Result<RatingTally, Error> {
        let RateTopicRequest {
            topic_id,
            user_id,
            is_liked,
        } = request;
        self.record_vote(&topic_id, &user_id, is_liked).await?;
        self.votes.tally(&topic_id).await.map_err(map_vote_error)
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;

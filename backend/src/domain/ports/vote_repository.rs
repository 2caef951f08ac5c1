//! Driven port for vote persistence.
//!
//! Adapters must enforce a uniqueness constraint on `(topic_id, user_id)` and
//! surface a violation as [`VoteRepositoryError::DuplicateVote`]; the rating
//! service relies on it to resolve concurrent first votes.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{RatingTally, TopicId, UserId, Vote};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vote repository adapters.
    pub enum VoteRepositoryError {
        Connection { message: String } => "vote repository connection failed: {message}",
        Query { message: String } => "vote repository query failed: {message}",
        DuplicateVote => "a vote already exists for this user and topic",
        TopicNotFound => "topic not found",
        UserNotFound => "voter does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn find_for(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
    ) -> Result<Option<Vote>, VoteRepositoryError>;

    async fn insert(&self, vote: &Vote) -> Result<(), VoteRepositoryError>;

    /// Overwrite the flag of an existing vote. Returns `false` when no vote
    /// exists for the pair.
    async fn set_liked(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
        is_liked: bool,
    ) -> Result<bool, VoteRepositoryError>;

    async fn tally(&self, topic_id: &TopicId) -> Result<RatingTally, VoteRepositoryError>;

    /// Tallies for several topics; topics without votes are absent.
    async fn tallies(
        &self,
        topic_ids: &[TopicId],
    ) -> Result<HashMap<TopicId, RatingTally>, VoteRepositoryError>;
}

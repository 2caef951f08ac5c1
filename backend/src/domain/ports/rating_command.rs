//! Driving port for rating topics.

use async_trait::async_trait;

use crate::domain::{Error, RateTopicRequest, RatingTally};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingCommand: Send + Sync {
    /// Record the user's like or dislike and return the fresh counts.
    async fn rate(&self, request: RateTopicRequest) -> Result<RatingTally, Error>;
}

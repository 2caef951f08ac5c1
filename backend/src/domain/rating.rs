//! Votes and the counts derived from them.
//!
//! A vote is a single mutable flag per `(topic, user)` pair. Counts are never
//! stored; they are recomputed from the current set of votes on every read.

use super::{TopicId, UserId, VoteId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub id: VoteId,
    pub topic_id: TopicId,
    pub user_id: UserId,
    pub is_liked: bool,
}

impl Vote {
    pub fn new(topic_id: TopicId, user_id: UserId, is_liked: bool) -> Self {
        Self {
            id: VoteId::random(),
            topic_id,
            user_id,
            is_liked,
        }
    }
}

/// Like and dislike counts for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    pub like_count: u64,
    pub dislike_count: u64,
}

impl RatingTally {
    /// Count the `is_liked` flags of a topic's votes.
    ///
    /// # Examples
    /// ```
    /// use homecraft::domain::RatingTally;
    ///
    /// let tally = RatingTally::from_flags([true, false, false]);
    /// assert_eq!((tally.like_count, tally.dislike_count), (1, 2));
    /// ```
    pub fn from_flags(flags: impl IntoIterator<Item = bool>) -> Self {
        flags.into_iter().fold(Self::default(), |mut tally, liked| {
            tally.record(liked);
            tally
        })
    }

    pub fn record(&mut self, is_liked: bool) {
        if is_liked {
            self.like_count = self.like_count.saturating_add(1);
        } else {
            self.dislike_count = self.dislike_count.saturating_add(1);
        }
    }

    /// Number of distinct raters.
    pub const fn total(&self) -> u64 {
        self.like_count.saturating_add(self.dislike_count)
    }
}

/// A rating submitted by an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTopicRequest {
    pub topic_id: TopicId,
    pub user_id: UserId,
    pub is_liked: bool,
}

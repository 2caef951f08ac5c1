//! PostgreSQL-backed `VoteRepository`.
//!
//! `votes_topic_id_user_id_key` enforces one vote per user and topic; losing
//! an insert race against it yields [`VoteRepositoryError::DuplicateVote`],
//! which the rating service resolves by updating the winner's row.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{VoteRepository, VoteRepositoryError};
use crate::domain::{RatingTally, TopicId, UserId, Vote};

use super::diesel_error_mapping::{DbFailure, VOTES_TOPIC_FK, VOTES_USER_FK};
use super::models::VoteRow;
use super::pool::DbPool;
use super::schema::votes;

const VOTES_UNIQUE_PAIR: &str = "votes_topic_id_user_id_key";

#[derive(Clone)]
pub struct DieselVoteRepository {
    pool: DbPool,
}

impl DieselVoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for VoteRepositoryError {
    fn from(failure: DbFailure) -> Self {
        if failure.violates(VOTES_TOPIC_FK) {
            return Self::topic_not_found();
        }
        if failure.violates(VOTES_USER_FK) {
            return Self::user_not_found();
        }
        match failure {
            DbFailure::UniqueViolation { constraint }
                if constraint.as_deref().is_none_or(|name| name == VOTES_UNIQUE_PAIR) =>
            {
                Self::duplicate_vote()
            }
            DbFailure::Connection(message) => Self::connection(message),
            other => Self::query(other.into_message()),
        }
    }
}

#[async_trait]
impl VoteRepository for DieselVoteRepository {
    async fn find_for(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
    ) -> Result<Option<Vote>, VoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let row = votes::table
            .filter(votes::topic_id.eq(*topic_id.as_uuid()))
            .filter(votes::user_id.eq(*user_id.as_uuid()))
            .select(VoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DbFailure::from)?;
        Ok(row.map(Vote::from))
    }

    async fn insert(&self, vote: &Vote) -> Result<(), VoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        diesel::insert_into(votes::table)
            .values(VoteRow::from(vote))
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(())
    }

    async fn set_liked(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
        is_liked: bool,
    ) -> Result<bool, VoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let updated = diesel::update(
            votes::table
                .filter(votes::topic_id.eq(*topic_id.as_uuid()))
                .filter(votes::user_id.eq(*user_id.as_uuid())),
        )
        .set(votes::is_liked.eq(is_liked))
        .execute(&mut conn)
        .await
        .map_err(DbFailure::from)?;
        Ok(updated > 0)
    }

    async fn tally(&self, topic_id: &TopicId) -> Result<RatingTally, VoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let flags: Vec<bool> = votes::table
            .filter(votes::topic_id.eq(*topic_id.as_uuid()))
            .select(votes::is_liked)
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(RatingTally::from_flags(flags))
    }

    async fn tallies(
        &self,
        topic_ids: &[TopicId],
    ) -> Result<HashMap<TopicId, RatingTally>, VoteRepositoryError> {
        if topic_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let uuids: Vec<Uuid> = topic_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let rows: Vec<(Uuid, bool)> = votes::table
            .filter(votes::topic_id.eq_any(uuids))
            .select((votes::topic_id, votes::is_liked))
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;

        let mut tallies: HashMap<TopicId, RatingTally> = HashMap::new();
        for (topic_id, is_liked) in rows {
            tallies
                .entry(TopicId::from_uuid(topic_id))
                .or_default()
                .record(is_liked);
        }
        Ok(tallies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(VOTES_UNIQUE_PAIR))]
    #[case(None)]
    fn pair_collisions_are_duplicate_votes(#[case] constraint: Option<&str>) {
        let failure = DbFailure::UniqueViolation {
            constraint: constraint.map(str::to_owned),
        };

        assert_eq!(
            VoteRepositoryError::from(failure),
            VoteRepositoryError::duplicate_vote()
        );
    }

    #[rstest]
    fn primary_key_collisions_are_query_failures() {
        let failure = DbFailure::UniqueViolation {
            constraint: Some("votes_pkey".to_owned()),
        };

        assert!(matches!(
            VoteRepositoryError::from(failure),
            VoteRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn votes_on_deleted_topics_are_rejected() {
        let failure = DbFailure::ForeignKeyViolation {
            constraint: Some(VOTES_TOPIC_FK.to_owned()),
        };

        assert_eq!(
            VoteRepositoryError::from(failure),
            VoteRepositoryError::topic_not_found()
        );
    }

    #[rstest]
    fn votes_by_unknown_users_are_rejected() {
        let failure = DbFailure::ForeignKeyViolation {
            constraint: Some(VOTES_USER_FK.to_owned()),
        };

        assert_eq!(
            VoteRepositoryError::from(failure),
            VoteRepositoryError::user_not_found()
        );
    }
}

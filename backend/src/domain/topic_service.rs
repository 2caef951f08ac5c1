//! Topic use cases: authoring, moderation, comments, and the read views.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::authorization::{ensure_admin, ensure_can_modify};
use super::error::FieldErrors;
use super::port_errors::{
    map_category_error, map_comment_error, map_favorite_error, map_topic_error, map_vote_error,
    revision_conflict, topic_not_found,
};
use super::ports::{
    CategoryRepository, CommentRepository, FavoriteRepository, TopicRepository,
    TopicRepositoryError, TopicsCommand, TopicsQuery, VoteRepository,
};
use super::{
    Actor, CategoryId, Comment, CommentBody, DEFAULT_SHORT_DESCRIPTION_LIMIT, Error, Topic,
    TopicDetails, TopicDraft, TopicEditForm, TopicId, TopicIndex, TopicRecord, TopicSummary,
    UpdateTopicRequest, UserId,
};

/// Repositories the topic service reads and writes.
#[derive(Clone)]
pub struct TopicRepositories {
    pub topics: Arc<dyn TopicRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
}

impl TopicRepositories {
    /// Use one store that implements every repository.
    pub fn from_store<S>(store: &Arc<S>) -> Self
    where
        S: TopicRepository
            + CategoryRepository
            + CommentRepository
            + VoteRepository
            + FavoriteRepository
            + 'static,
    {
        Self {
            topics: store.clone(),
            categories: store.clone(),
            comments: store.clone(),
            votes: store.clone(),
            favorites: store.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TopicService {
    repos: TopicRepositories,
    clock: Arc<dyn Clock>,
    description_limit: usize,
}

impl TopicService {
    pub fn new(repos: TopicRepositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos,
            clock,
            description_limit: DEFAULT_SHORT_DESCRIPTION_LIMIT,
        }
    }

    /// Characters kept in list-view descriptions.
    #[must_use]
    pub fn with_description_limit(mut self, limit: usize) -> Self {
        self.description_limit = limit;
        self
    }

    async fn load_record(&self, topic_id: &TopicId) -> Result<TopicRecord, Error> {
        self.repos
            .topics
            .find_record(topic_id)
            .await
            .map_err(map_topic_error)?
            .ok_or_else(topic_not_found)
    }

    /// Load the topic and apply the owner-or-admin rule.
    async fn load_for_modification(
        &self,
        actor: &Actor,
        topic_id: &TopicId,
    ) -> Result<TopicRecord, Error> {
        let record = self.load_record(topic_id).await?;
        ensure_can_modify(actor, &record.topic.owner_id, "topic")?;
        Ok(record)
    }

    async fn ensure_category_exists(&self, category_id: Option<CategoryId>) -> Result<(), Error> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        let found = self
            .repos
            .categories
            .find_by_id(&category_id)
            .await
            .map_err(map_category_error)?;
        if found.is_some() {
            Ok(())
        } else {
            Err(unknown_category())
        }
    }

    async fn store_update(&self, updated: &Topic, expected_revision: u32) -> Result<(), Error> {
        match self.repos.topics.update(updated, expected_revision).await {
            Ok(()) => Ok(()),
            Err(TopicRepositoryError::CategoryNotFound) => Err(unknown_category()),
            Err(err) => Err(map_topic_error(err)),
        }
    }

    async fn summarise(
        &self,
        records: Vec<TopicRecord>,
        favorited: &HashSet<TopicId>,
    ) -> Result<Vec<TopicSummary>, Error> {
        let ids: Vec<TopicId> = records.iter().map(|record| record.topic.id).collect();
        let tallies = self
            .repos
            .votes
            .tallies(&ids)
            .await
            .map_err(map_vote_error)?;
        Ok(records
            .into_iter()
            .map(|record| {
                let id = record.topic.id;
                TopicSummary::project(
                    record,
                    tallies.get(&id).copied().unwrap_or_default(),
                    favorited.contains(&id),
                    self.description_limit,
                )
            })
            .collect())
    }

    async fn favorited_by(&self, viewer: Option<UserId>) -> Result<Vec<TopicId>, Error> {
        match viewer {
            Some(user_id) => self
                .repos
                .favorites
                .topic_ids_for_user(&user_id)
                .await
                .map_err(map_favorite_error),
            None => Ok(Vec::new()),
        }
    }
}

fn unknown_category() -> Error {
    let mut errors = FieldErrors::new();
    errors.push("categoryId", "category does not exist");
    Error::validation(&errors)
}

#[async_trait]
impl TopicsCommand for TopicService {
    async fn create_topic(&self, actor: &Actor, draft: TopicDraft) -> Result<Topic, Error> {
        self.ensure_category_exists(draft.category_id).await?;
        let topic = Topic::create(draft, *actor.user_id(), self.clock.utc());
        match self.repos.topics.insert(&topic).await {
            Ok(()) => {}
            Err(TopicRepositoryError::CategoryNotFound) => return Err(unknown_category()),
            Err(err) => return Err(map_topic_error(err)),
        }
        info!(topic_id = %topic.id, owner_id = %topic.owner_id, "topic created");
        Ok(topic)
    }

    async fn update_topic(
        &self,
        actor: &Actor,
        request: UpdateTopicRequest,
    ) -> Result<Topic, Error> {
        let UpdateTopicRequest {
            topic_id,
            draft,
            expected_revision,
        } = request;
        let current = self.load_for_modification(actor, &topic_id).await?.topic;
        if let Some(expected) = expected_revision.filter(|rev| *rev != current.revision) {
            return Err(revision_conflict(expected, current.revision));
        }
        self.ensure_category_exists(draft.category_id).await?;

        let updated = current.revised(draft);
        self.store_update(&updated, current.revision).await?;
        Ok(updated)
    }

    async fn delete_topic(&self, actor: &Actor, topic_id: &TopicId) -> Result<(), Error> {
        self.load_for_modification(actor, topic_id).await?;
        let deleted = self
            .repos
            .topics
            .delete(topic_id)
            .await
            .map_err(map_topic_error)?;
        if !deleted {
            return Err(topic_not_found());
        }
        info!(%topic_id, actor_id = %actor.user_id(), "topic deleted");
        Ok(())
    }

    async fn move_topic(
        &self,
        actor: &Actor,
        topic_id: &TopicId,
        category_id: Option<CategoryId>,
    ) -> Result<Topic, Error> {
        ensure_admin(actor)?;
        let current = self.load_record(topic_id).await?.topic;
        self.ensure_category_exists(category_id).await?;

        let moved = current.moved_to(category_id);
        self.store_update(&moved, current.revision).await?;
        info!(%topic_id, category_id = ?category_id, "topic moved");
        Ok(moved)
    }

    async fn post_comment(
        &self,
        actor: &Actor,
        topic_id: &TopicId,
        content: CommentBody,
    ) -> Result<Comment, Error> {
        self.load_record(topic_id).await?;
        let comment = Comment::new(*topic_id, *actor.user_id(), content, self.clock.utc());
        self.repos
            .comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        Ok(comment)
    }
}

#[async_trait]
impl TopicsQuery for TopicService {
    async fn list_topics(
        &self,
        category_id: Option<CategoryId>,
        viewer: Option<UserId>,
    ) -> Result<TopicIndex, Error> {
        let records = self
            .repos
            .topics
            .list_records(category_id)
            .await
            .map_err(map_topic_error)?;
        let favorited: HashSet<TopicId> = self.favorited_by(viewer).await?.into_iter().collect();
        let topics = self.summarise(records, &favorited).await?;
        let categories = self
            .repos
            .categories
            .list()
            .await
            .map_err(map_category_error)?;
        Ok(TopicIndex {
            topics,
            categories,
            selected_category: category_id,
        })
    }

    async fn topic_details(
        &self,
        topic_id: &TopicId,
        viewer: Option<UserId>,
    ) -> Result<TopicDetails, Error> {
        let record = self.load_record(topic_id).await?;
        let comments = self
            .repos
            .comments
            .list_for_topic(topic_id)
            .await
            .map_err(map_comment_error)?;
        let tally = self
            .repos
            .votes
            .tally(topic_id)
            .await
            .map_err(map_vote_error)?;
        let favorite_count = self
            .repos
            .favorites
            .count_for_topic(topic_id)
            .await
            .map_err(map_favorite_error)?;

        let (viewer_vote, viewer_favorited) = match viewer {
            Some(user_id) => {
                let vote = self
                    .repos
                    .votes
                    .find_for(topic_id, &user_id)
                    .await
                    .map_err(map_vote_error)?;
                let favorite = self
                    .repos
                    .favorites
                    .find_for(&user_id, topic_id)
                    .await
                    .map_err(map_favorite_error)?;
                (vote.map(|v| v.is_liked), favorite.is_some())
            }
            None => (None, false),
        };

        Ok(TopicDetails {
            record,
            comments,
            tally,
            favorite_count,
            viewer_vote,
            viewer_favorited,
        })
    }

    async fn edit_form(&self, actor: &Actor, topic_id: &TopicId) -> Result<TopicEditForm, Error> {
        let record = self.load_for_modification(actor, topic_id).await?;
        let categories = self
            .repos
            .categories
            .list()
            .await
            .map_err(map_category_error)?;
        Ok(TopicEditForm { record, categories })
    }

    async fn delete_confirmation(
        &self,
        actor: &Actor,
        topic_id: &TopicId,
    ) -> Result<TopicRecord, Error> {
        self.load_for_modification(actor, topic_id).await
    }

    async fn favorite_topics(&self, actor: &Actor) -> Result<Vec<TopicSummary>, Error> {
        let ids = self.favorited_by(Some(*actor.user_id())).await?;
        let records = self
            .repos
            .topics
            .find_records(&ids)
            .await
            .map_err(map_topic_error)?;

        let mut by_id: HashMap<TopicId, TopicRecord> = records
            .into_iter()
            .map(|record| (record.topic.id, record))
            .collect();
        let ordered: Vec<TopicRecord> = ids.iter().filter_map(|id| by_id.remove(id)).collect();
        let favorited: HashSet<TopicId> = ids.into_iter().collect();
        self.summarise(ordered, &favorited).await
    }
}

#[cfg(test)]
#[path = "topic_service_tests.rs"]
mod tests;

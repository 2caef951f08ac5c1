//! Driving port for topic views.

use async_trait::async_trait;

use crate::domain::{
    Actor, CategoryId, Error, TopicDetails, TopicEditForm, TopicId, TopicIndex, TopicRecord,
    TopicSummary, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicsQuery: Send + Sync {
    /// Newest first, optionally filtered; `viewer` drives the favorite flag.
    async fn list_topics(
        &self,
        category_id: Option<CategoryId>,
        viewer: Option<UserId>,
    ) -> Result<TopicIndex, Error>;

    async fn topic_details(
        &self,
        topic_id: &TopicId,
        viewer: Option<UserId>,
    ) -> Result<TopicDetails, Error>;

    /// Owner or admin only.
    async fn edit_form(&self, actor: &Actor, topic_id: &TopicId) -> Result<TopicEditForm, Error>;

    /// Owner or admin only.
    async fn delete_confirmation(
        &self,
        actor: &Actor,
        topic_id: &TopicId,
    ) -> Result<TopicRecord, Error>;

    async fn favorite_topics(&self, actor: &Actor) -> Result<Vec<TopicSummary>, Error>;
}

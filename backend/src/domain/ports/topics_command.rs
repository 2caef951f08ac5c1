//! Driving port for topic mutations.
//!
//! Every method takes the acting user explicitly; ownership and role checks
//! happen inside the implementation on each call.

use async_trait::async_trait;

use crate::domain::{
    Actor, CategoryId, Comment, CommentBody, Error, Topic, TopicDraft, TopicId, UpdateTopicRequest,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicsCommand: Send + Sync {
    async fn create_topic(&self, actor: &Actor, draft: TopicDraft) -> Result<Topic, Error>;

    /// Owner or admin only; stale revisions are reported as `conflict`.
    async fn update_topic(&self, actor: &Actor, request: UpdateTopicRequest)
    -> Result<Topic, Error>;

    /// Owner or admin only.
    async fn delete_topic(&self, actor: &Actor, topic_id: &TopicId) -> Result<(), Error>;

    /// Admin only; changes the category and nothing else.
    async fn move_topic(
        &self,
        actor: &Actor,
        topic_id: &TopicId,
        category_id: Option<CategoryId>,
    ) -> Result<Topic, Error>;

    async fn post_comment(
        &self,
        actor: &Actor,
        topic_id: &TopicId,
        content: CommentBody,
    ) -> Result<Comment, Error>;
}

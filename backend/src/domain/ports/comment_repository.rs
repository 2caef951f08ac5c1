//! Driven port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentRecord, TopicId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        Connection { message: String } => "comment repository connection failed: {message}",
        Query { message: String } => "comment repository query failed: {message}",
        TopicNotFound => "topic not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Comments on the topic, oldest first.
    async fn list_for_topic(
        &self,
        topic_id: &TopicId,
    ) -> Result<Vec<CommentRecord>, CommentRepositoryError>;
}

//! Comments posted under a topic.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{CommentId, TopicId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyComment;

impl fmt::Display for EmptyComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "comment must not be empty")
    }
}

impl std::error::Error for EmptyComment {}

/// Non-blank comment text, kept as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(raw: &str) -> Result<Self, EmptyComment> {
        if raw.trim().is_empty() {
            return Err(EmptyComment);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub topic_id: TopicId,
    pub author_id: UserId,
    pub content: CommentBody,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        topic_id: TopicId,
        author_id: UserId,
        content: CommentBody,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::random(),
            topic_id,
            author_id,
            content,
            created_at,
        }
    }
}

/// A comment with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author_name: String,
}

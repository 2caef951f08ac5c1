//! Topics, their validated fields, and the list-view projection.

use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;

use super::category::Category;
use super::comment::CommentRecord;
use super::error::FieldErrors;
use super::rating::RatingTally;
use super::{CategoryId, TopicId, UserId};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 20;
/// Characters kept by [`short_description`] in list views.
pub const DEFAULT_SHORT_DESCRIPTION_LIMIT: usize = 100;
pub const ELLIPSIS: &str = "...";

/// Cut `full` to `limit` characters and append [`ELLIPSIS`] when longer.
///
/// Counting is by `char`, not by word; a word may be split.
///
/// # Examples
/// ```
/// use homecraft::domain::short_description;
///
/// assert_eq!(short_description("Leaky faucet", 100), "Leaky faucet");
/// assert_eq!(short_description("Leaky faucet", 5), "Leaky...");
/// ```
pub fn short_description(full: &str, limit: usize) -> String {
    if full.char_indices().nth(limit).is_none() {
        return full.to_owned();
    }
    let mut short: String = full.chars().take(limit).collect();
    short.push_str(ELLIPSIS);
    short
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyDescription,
    DescriptionTooShort { min: usize },
    InvalidMediaUrl,
}

impl fmt::Display for TopicValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description is required"),
            Self::DescriptionTooShort { min } => {
                write!(f, "description must be at least {min} characters")
            }
            Self::InvalidMediaUrl => write!(f, "media URL must be an absolute http(s) URL"),
        }
    }
}

impl std::error::Error for TopicValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTitle(String);

impl TopicTitle {
    pub fn new(raw: &str) -> Result<Self, TopicValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(TopicValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-text body, stored exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDescription(String);

impl TopicDescription {
    pub fn new(raw: &str) -> Result<Self, TopicValidationError> {
        if raw.trim().is_empty() {
            return Err(TopicValidationError::EmptyDescription);
        }
        if raw.chars().count() < DESCRIPTION_MIN {
            return Err(TopicValidationError::DescriptionTooShort {
                min: DESCRIPTION_MIN,
            });
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional picture or video link attached to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl(Url);

impl MediaUrl {
    pub fn new(raw: &str) -> Result<Self, TopicValidationError> {
        let url = Url::parse(raw.trim()).map_err(|_| TopicValidationError::InvalidMediaUrl)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TopicValidationError::InvalidMediaUrl);
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn parse_media_url(raw: Option<&str>) -> Result<Option<MediaUrl>, TopicValidationError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(MediaUrl::new)
        .transpose()
}

/// Validated fields submitted by the create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDraft {
    pub title: TopicTitle,
    pub description: TopicDescription,
    pub media_url: Option<MediaUrl>,
    pub category_id: Option<CategoryId>,
}

impl TopicDraft {
    pub fn try_new(
        title: &str,
        description: &str,
        media_url: Option<&str>,
        category_id: Option<CategoryId>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = errors.collect("title", TopicTitle::new(title));
        let description = errors.collect("description", TopicDescription::new(description));
        let media_url = errors.collect("mediaUrl", parse_media_url(media_url));
        match (title, description, media_url) {
            (Some(title), Some(description), Some(media_url)) => Ok(Self {
                title,
                description,
                media_url,
                category_id,
            }),
            _ => Err(errors),
        }
    }
}

/// A stored topic.
///
/// `revision` starts at 1 and increases with every committed change; updates
/// name the revision they were based on so stale writes are detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub title: TopicTitle,
    pub description: TopicDescription,
    pub media_url: Option<MediaUrl>,
    pub created_at: DateTime<Utc>,
    pub owner_id: UserId,
    pub category_id: Option<CategoryId>,
    pub revision: u32,
}

impl Topic {
    pub fn create(draft: TopicDraft, owner_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TopicId::random(),
            title: draft.title,
            description: draft.description,
            media_url: draft.media_url,
            created_at,
            owner_id,
            category_id: draft.category_id,
            revision: 1,
        }
    }

    /// Apply edited fields; ownership and creation time never change.
    pub fn revised(&self, draft: TopicDraft) -> Self {
        Self {
            id: self.id,
            title: draft.title,
            description: draft.description,
            media_url: draft.media_url,
            created_at: self.created_at,
            owner_id: self.owner_id,
            category_id: draft.category_id,
            revision: self.revision.saturating_add(1),
        }
    }

    /// Reassign the category only.
    pub fn moved_to(&self, category_id: Option<CategoryId>) -> Self {
        Self {
            category_id,
            revision: self.revision.saturating_add(1),
            ..self.clone()
        }
    }
}

/// A topic joined with the names shown beside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    pub topic: Topic,
    pub author_name: String,
    pub category_name: Option<String>,
}

/// One row of a topic list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    pub id: TopicId,
    pub title: String,
    pub short_description: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner_id: UserId,
    pub author_name: String,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub tally: RatingTally,
    pub is_favorited: bool,
}

impl TopicSummary {
    pub fn project(
        record: TopicRecord,
        tally: RatingTally,
        is_favorited: bool,
        description_limit: usize,
    ) -> Self {
        let TopicRecord {
            topic,
            author_name,
            category_name,
        } = record;
        Self {
            id: topic.id,
            title: topic.title.as_str().to_owned(),
            short_description: short_description(topic.description.as_str(), description_limit),
            media_url: topic.media_url.as_ref().map(|url| url.as_str().to_owned()),
            created_at: topic.created_at,
            owner_id: topic.owner_id,
            author_name,
            category_id: topic.category_id,
            category_name,
            tally,
            is_favorited,
        }
    }
}

/// Topic list with the category filter that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicIndex {
    pub topics: Vec<TopicSummary>,
    pub categories: Vec<Category>,
    pub selected_category: Option<CategoryId>,
}

/// Everything the topic page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDetails {
    pub record: TopicRecord,
    pub comments: Vec<CommentRecord>,
    pub tally: RatingTally,
    pub favorite_count: u64,
    /// The viewer's own rating, if they have rated.
    pub viewer_vote: Option<bool>,
    pub viewer_favorited: bool,
}

/// Data needed to render the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEditForm {
    pub record: TopicRecord,
    pub categories: Vec<Category>,
}

/// Edit submitted for an existing topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTopicRequest {
    pub topic_id: TopicId,
    pub draft: TopicDraft,
    /// Revision the editor started from; `None` skips the staleness check.
    pub expected_revision: Option<u32>,
}

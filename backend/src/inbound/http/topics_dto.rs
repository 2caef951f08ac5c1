//! Topic, comment and rating DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CategoryId, Comment, CommentBody, Error, FieldErrors, RatingTally, Topic, TopicDetails, TopicDraft,
    TopicEditForm, TopicIndex, TopicRecord, TopicSummary,
};
use crate::inbound::http::categories::CategoryResponse;
use crate::inbound::http::validation::{invalid_form, parse_optional_id};

#[derive(Debug, Deserialize)]
pub(super) struct TopicPath {
    pub(super) topic_id: String,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TopicListQuery {
    /// Only list topics filed under this category.
    pub category_id: Option<String>,
}

/// Fields submitted by the create and edit forms.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicFormRequest {
    pub title: String,
    pub description: String,
    pub media_url: Option<String>,
    pub category_id: Option<String>,
}

/// Edit form submission, naming the revision it was based on.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicUpdateRequest {
    #[serde(flatten)]
    pub form: TopicFormRequest,
    pub expected_revision: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveTopicRequest {
    /// Target category; omit or leave blank to uncategorise.
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
}

/// Validate a submitted form, echoing it back on failure.
pub(super) fn parse_topic_form(form: &TopicFormRequest) -> Result<TopicDraft, Error> {
    let mut errors = FieldErrors::new();
    let category_id = errors
        .collect(
            "categoryId",
            parse_optional_id::<CategoryId>(form.category_id.as_deref(), "categoryId"),
        )
        .flatten();
    let draft = TopicDraft::try_new(
        &form.title,
        &form.description,
        form.media_url.as_deref(),
        category_id,
    );
    match draft {
        Ok(draft) if errors.is_empty() => Ok(draft),
        Ok(_) => Err(invalid_form(&errors, form)),
        Err(draft_errors) => {
            errors.merge(draft_errors);
            Err(invalid_form(&errors, form))
        }
    }
}

pub(super) fn parse_comment(request: &CommentRequest) -> Result<CommentBody, Error> {
    let mut errors = FieldErrors::new();
    match errors.collect("content", CommentBody::new(&request.content)) {
        Some(body) => Ok(body),
        None => Err(invalid_form(&errors, request)),
    }
}

/// A stored topic as returned by mutating endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub media_url: Option<String>,
    pub created_at: String,
    pub owner_id: String,
    pub category_id: Option<String>,
    pub revision: u32,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id.to_string(),
            title: topic.title.as_str().to_owned(),
            description: topic.description.as_str().to_owned(),
            media_url: topic.media_url.map(|url| url.as_str().to_owned()),
            created_at: topic.created_at.to_rfc3339(),
            owner_id: topic.owner_id.to_string(),
            category_id: topic.category_id.map(|id| id.to_string()),
            revision: topic.revision,
        }
    }
}

/// A topic with its author and category names.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecordResponse {
    pub topic: TopicResponse,
    pub author_name: String,
    pub category_name: Option<String>,
}

impl From<TopicRecord> for TopicRecordResponse {
    fn from(record: TopicRecord) -> Self {
        Self {
            topic: TopicResponse::from(record.topic),
            author_name: record.author_name,
            category_name: record.category_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub like_count: u64,
    pub dislike_count: u64,
}

impl From<RatingTally> for RatingResponse {
    fn from(tally: RatingTally) -> Self {
        Self {
            like_count: tally.like_count,
            dislike_count: tally.dislike_count,
        }
    }
}

/// One entry of the topic index.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummaryResponse {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub media_url: Option<String>,
    pub created_at: String,
    pub owner_id: String,
    pub author_name: String,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub like_count: u64,
    pub dislike_count: u64,
    pub is_favorited: bool,
}

impl From<TopicSummary> for TopicSummaryResponse {
    fn from(summary: TopicSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            title: summary.title,
            short_description: summary.short_description,
            media_url: summary.media_url,
            created_at: summary.created_at.to_rfc3339(),
            owner_id: summary.owner_id.to_string(),
            author_name: summary.author_name,
            category_id: summary.category_id.map(|id| id.to_string()),
            category_name: summary.category_name,
            like_count: summary.tally.like_count,
            dislike_count: summary.tally.dislike_count,
            is_favorited: summary.is_favorited,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicIndexResponse {
    #[schema(max_items = 10_000)]
    pub topics: Vec<TopicSummaryResponse>,
    pub categories: Vec<CategoryResponse>,
    pub selected_category_id: Option<String>,
}

impl From<TopicIndex> for TopicIndexResponse {
    fn from(index: TopicIndex) -> Self {
        Self {
            topics: index.topics.into_iter().map(Into::into).collect(),
            categories: index.categories.into_iter().map(Into::into).collect(),
            selected_category_id: index.selected_category.map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub author_id: String,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: String,
}

impl CommentResponse {
    fn new(comment: Comment, author_name: Option<String>) -> Self {
        Self {
            id: comment.id.to_string(),
            author_id: comment.author_id.to_string(),
            author_name,
            content: comment.content.as_str().to_owned(),
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::new(comment, None)
    }
}

/// Everything the topic page shows.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicDetailsResponse {
    #[serde(flatten)]
    pub record: TopicRecordResponse,
    pub comments: Vec<CommentResponse>,
    pub rating: RatingResponse,
    pub favorite_count: u64,
    pub viewer_vote: Option<bool>,
    pub viewer_favorited: bool,
}

impl From<TopicDetails> for TopicDetailsResponse {
    fn from(details: TopicDetails) -> Self {
        Self {
            record: TopicRecordResponse::from(details.record),
            comments: details
                .comments
                .into_iter()
                .map(|record| CommentResponse::new(record.comment, Some(record.author_name)))
                .collect(),
            rating: RatingResponse::from(details.tally),
            favorite_count: details.favorite_count,
            viewer_vote: details.viewer_vote,
            viewer_favorited: details.viewer_favorited,
        }
    }
}

/// The edit form: current values plus the categories to choose from.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicEditFormResponse {
    #[serde(flatten)]
    pub record: TopicRecordResponse,
    pub categories: Vec<CategoryResponse>,
}

impl From<TopicEditForm> for TopicEditFormResponse {
    fn from(form: TopicEditForm) -> Self {
        Self {
            record: TopicRecordResponse::from(form.record),
            categories: form.categories.into_iter().map(Into::into).collect(),
        }
    }
}

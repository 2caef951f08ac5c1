//! Topic API handlers.
//!
//! ```text
//! GET /api/v1/topics?categoryId=...
//! POST /api/v1/topics
//! GET /api/v1/topics/{topic_id}
//! GET /api/v1/topics/{topic_id}/edit
//! PUT /api/v1/topics/{topic_id}
//! GET /api/v1/topics/{topic_id}/delete
//! DELETE /api/v1/topics/{topic_id}
//! PUT /api/v1/topics/{topic_id}/category
//! POST /api/v1/topics/{topic_id}/comments
//! ```
//!
//! Reads are public; the viewer, when signed in, personalises vote and
//! favorite flags. Edit and delete check ownership on both the GET that
//! renders the form and the request that mutates.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{CategoryId, Error, FieldErrors, TopicId, UpdateTopicRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::topics_dto::{
    CommentRequest, CommentResponse, MoveTopicRequest, TopicDetailsResponse,
    TopicEditFormResponse, TopicFormRequest, TopicIndexResponse, TopicListQuery, TopicPath,
    TopicRecordResponse, TopicResponse, TopicUpdateRequest, parse_comment, parse_topic_form,
};
use crate::inbound::http::validation::{parse_id, parse_optional_id};

pub(super) fn parse_topic_id(path: TopicPath) -> Result<TopicId, Error> {
    parse_id(&path.topic_id, "topicId")
}

fn parse_category_filter(raw: Option<&str>) -> Result<Option<CategoryId>, Error> {
    parse_optional_id(raw, "categoryId").map_err(|message| {
        let mut errors = FieldErrors::new();
        errors.push("categoryId", message);
        Error::validation(&errors)
    })
}

/// Topics newest first, optionally filtered by category.
#[utoipa::path(
    get,
    path = "/api/v1/topics",
    params(TopicListQuery),
    responses(
        (status = 200, description = "Topic index", body = TopicIndexResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "listTopics",
    security([])
)]
#[get("/topics")]
pub async fn list_topics(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<TopicListQuery>,
) -> ApiResult<web::Json<TopicIndexResponse>> {
    let category_id = parse_category_filter(query.category_id.as_deref())?;
    let viewer = session.user_id()?;
    let index = state.topics_query.list_topics(category_id, viewer).await?;
    Ok(web::Json(index.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/topics",
    request_body = TopicFormRequest,
    responses(
        (status = 201, description = "Created topic", body = TopicResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "createTopic"
)]
#[post("/topics")]
pub async fn create_topic(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TopicFormRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let draft = parse_topic_form(&payload)?;
    let topic = state.topics.create_topic(&actor, draft).await?;
    Ok(HttpResponse::Created().json(TopicResponse::from(topic)))
}

/// The topic page: full text, comments, ratings and favorites.
#[utoipa::path(
    get,
    path = "/api/v1/topics/{topic_id}",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    responses(
        (status = 200, description = "Topic details", body = TopicDetailsResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "getTopic",
    security([])
)]
#[get("/topics/{topic_id}")]
pub async fn get_topic(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
) -> ApiResult<web::Json<TopicDetailsResponse>> {
    let topic_id = parse_topic_id(path.into_inner())?;
    let viewer = session.user_id()?;
    let details = state.topics_query.topic_details(&topic_id, viewer).await?;
    Ok(web::Json(details.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/topics/{topic_id}/edit",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    responses(
        (status = 200, description = "Edit form", body = TopicEditFormResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "editTopicForm"
)]
#[get("/topics/{topic_id}/edit")]
pub async fn edit_topic_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
) -> ApiResult<web::Json<TopicEditFormResponse>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    let form = state.topics_query.edit_form(&actor, &topic_id).await?;
    Ok(web::Json(form.into()))
}

/// Replace a topic's editable fields.
///
/// Supplying `expectedRevision` turns a concurrent edit into a 409 instead
/// of silently overwriting it.
#[utoipa::path(
    put,
    path = "/api/v1/topics/{topic_id}",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    request_body = TopicUpdateRequest,
    responses(
        (status = 200, description = "Updated topic", body = TopicResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Revision mismatch", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "updateTopic"
)]
#[put("/topics/{topic_id}")]
pub async fn update_topic(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
    payload: web::Json<TopicUpdateRequest>,
) -> ApiResult<web::Json<TopicResponse>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    let draft = parse_topic_form(&payload.form)?;
    let topic = state
        .topics
        .update_topic(
            &actor,
            UpdateTopicRequest {
                topic_id,
                draft,
                expected_revision: payload.expected_revision,
            },
        )
        .await?;
    Ok(web::Json(topic.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/topics/{topic_id}/delete",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    responses(
        (status = 200, description = "Topic awaiting confirmation", body = TopicRecordResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "confirmTopicDeletion"
)]
#[get("/topics/{topic_id}/delete")]
pub async fn confirm_topic_deletion(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
) -> ApiResult<web::Json<TopicRecordResponse>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    let record = state
        .topics_query
        .delete_confirmation(&actor, &topic_id)
        .await?;
    Ok(web::Json(record.into()))
}

/// Delete a topic with its comments, votes and favorites.
#[utoipa::path(
    delete,
    path = "/api/v1/topics/{topic_id}",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    responses(
        (status = 204, description = "Topic deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "deleteTopic"
)]
#[delete("/topics/{topic_id}")]
pub async fn delete_topic(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    state.topics.delete_topic(&actor, &topic_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Refile a topic under another category. Administrators only.
#[utoipa::path(
    put,
    path = "/api/v1/topics/{topic_id}/category",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    request_body = MoveTopicRequest,
    responses(
        (status = 200, description = "Moved topic", body = TopicResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "moveTopic"
)]
#[put("/topics/{topic_id}/category")]
pub async fn move_topic(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
    payload: web::Json<MoveTopicRequest>,
) -> ApiResult<web::Json<TopicResponse>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    let category_id = parse_category_filter(payload.category_id.as_deref())?;
    let topic = state
        .topics
        .move_topic(&actor, &topic_id, category_id)
        .await?;
    Ok(web::Json(topic.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/topics/{topic_id}/comments",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Posted comment", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "postComment"
)]
#[post("/topics/{topic_id}/comments")]
pub async fn post_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    let content = parse_comment(&payload)?;
    let comment = state
        .topics
        .post_comment(&actor, &topic_id, content)
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

#[cfg(test)]
#[path = "topics_tests.rs"]
mod tests;

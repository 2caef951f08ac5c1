//! Favorite toggle handler.
//!
//! ```text
//! POST /api/v1/topics/{topic_id}/favorite
//! ```

use actix_web::{post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::FavoriteToggle;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::topics::parse_topic_id;
use crate::inbound::http::topics_dto::TopicPath;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    /// Whether the topic is now among the caller's favorites.
    pub is_favorited: bool,
}

impl From<FavoriteToggle> for FavoriteResponse {
    fn from(toggle: FavoriteToggle) -> Self {
        Self {
            is_favorited: toggle.is_favorited,
        }
    }
}

/// Add the topic to the caller's favorites, or remove it if present.
#[utoipa::path(
    post,
    path = "/api/v1/topics/{topic_id}/favorite",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    responses(
        (status = 200, description = "Favorite state after the toggle", body = FavoriteResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "toggleFavorite"
)]
#[post("/topics/{topic_id}/favorite")]
pub async fn toggle_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
) -> ApiResult<web::Json<FavoriteResponse>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    let toggle = state
        .favorites
        .toggle_favorite(actor.user_id(), &topic_id)
        .await?;
    Ok(web::Json(toggle.into()))
}

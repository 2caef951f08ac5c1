//! Rating API handler.
//!
//! ```text
//! POST /api/v1/topics/{topic_id}/rating {"isLiked":true}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::RateTopicRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::topics::parse_topic_id;
use crate::inbound::http::topics_dto::{RatingResponse, TopicPath};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    pub is_liked: bool,
}

/// Record or change the caller's vote and return the fresh tally.
///
/// Each user holds at most one vote per topic; voting again replaces it.
#[utoipa::path(
    post,
    path = "/api/v1/topics/{topic_id}/rating",
    params(("topic_id" = String, Path, description = "Topic identifier")),
    request_body = RateRequest,
    responses(
        (status = 200, description = "Updated tally", body = RatingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "rateTopic"
)]
#[post("/topics/{topic_id}/rating")]
pub async fn rate_topic(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TopicPath>,
    payload: web::Json<RateRequest>,
) -> ApiResult<web::Json<RatingResponse>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let topic_id = parse_topic_id(path.into_inner())?;
    let tally = state
        .ratings
        .rate(RateTopicRequest {
            topic_id,
            user_id: *actor.user_id(),
            is_liked: payload.is_liked,
        })
        .await?;
    Ok(web::Json(tally.into()))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::domain::{TopicId, UserId};
    use crate::inbound::http::test_utils::{forum_app, signed_in};
    use crate::test_support::ForumFixture;

    fn tally(body: &Value) -> (Option<u64>, Option<u64>) {
        (
            body.get("likeCount").and_then(Value::as_u64),
            body.get("dislikeCount").and_then(Value::as_u64),
        )
    }

    #[actix_web::test]
    async fn changing_a_vote_keeps_one_row() {
        let fixture = ForumFixture::new();
        let owner = fixture.add_member("Ada", "Lovelace").await;
        let voter = fixture.add_member("Grace", "Hopper").await;
        let topic = fixture.add_topic(&owner, "Leaky faucet", None).await;
        let app = test::init_service(forum_app(fixture.http_state())).await;
        let cookie = signed_in!(&app, &voter);
        let uri = format!("/api/v1/topics/{topic}/rating");

        let liked: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .cookie(cookie.clone())
                .set_json(json!({ "isLiked": true }))
                .to_request(),
        )
        .await;
        assert_eq!(tally(&liked), (Some(1), Some(0)));

        let disliked: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .cookie(cookie)
                .set_json(json!({ "isLiked": false }))
                .to_request(),
        )
        .await;
        assert_eq!(tally(&disliked), (Some(0), Some(1)));
        assert_eq!(fixture.store().vote_rows(&topic), 1);
    }

    #[actix_web::test]
    async fn anonymous_votes_are_refused() {
        let fixture = ForumFixture::new();
        let owner = fixture.add_member("Ada", "Lovelace").await;
        let topic = fixture.add_topic(&owner, "Leaky faucet", None).await;
        let app = test::init_service(forum_app(fixture.http_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/topics/{topic}/rating"))
                .set_json(json!({ "isLiked": true }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(fixture.store().vote_rows(&topic), 0);
    }

    #[actix_web::test]
    async fn sessions_for_unregistered_users_cannot_vote() {
        let fixture = ForumFixture::new();
        let owner = fixture.add_member("Ada", "Lovelace").await;
        let topic = fixture.add_topic(&owner, "Leaky faucet", None).await;
        let app = test::init_service(forum_app(fixture.http_state())).await;
        let cookie = signed_in!(&app, &UserId::random());

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/topics/{topic}/rating"))
                .cookie(cookie)
                .set_json(json!({ "isLiked": true }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(fixture.store().vote_rows(&topic), 0);
    }

    #[actix_web::test]
    async fn anonymous_callers_are_refused_before_the_id_is_checked() {
        let fixture = ForumFixture::new();
        let app = test::init_service(forum_app(fixture.http_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/topics/not-a-uuid/rating")
                .set_json(json!({ "isLiked": true }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn voting_on_missing_topics_is_not_found() {
        let fixture = ForumFixture::new();
        let voter = fixture.add_member("Grace", "Hopper").await;
        let app = test::init_service(forum_app(fixture.http_state())).await;
        let cookie = signed_in!(&app, &voter);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/topics/{}/rating", TopicId::random()))
                .cookie(cookie)
                .set_json(json!({ "isLiked": true }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

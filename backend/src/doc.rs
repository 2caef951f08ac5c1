//! OpenAPI documentation for the forum API.
//!
//! Registers every `/api/v1` handler, the health probes, the request and
//! response DTOs, and the session cookie security scheme. Served by Swagger
//! UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::categories::{
    CategoryOverviewResponse, CategoryRequest, CategoryResponse,
};
use crate::inbound::http::favorites::FavoriteResponse;
use crate::inbound::http::ratings::RateRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::topics_dto::{
    CommentRequest, CommentResponse, MoveTopicRequest, RatingResponse, TopicDetailsResponse,
    TopicEditFormResponse, TopicFormRequest, TopicIndexResponse, TopicRecordResponse,
    TopicResponse, TopicSummaryResponse, TopicUpdateRequest,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};

/// Session cookie issued by login and registration.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "HomeCraft forum API",
        description = "Topics, comments, ratings, favorites and categories for the HomeCraft home-improvement forum."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::my_favorites,
        crate::inbound::http::topics::list_topics,
        crate::inbound::http::topics::create_topic,
        crate::inbound::http::topics::get_topic,
        crate::inbound::http::topics::edit_topic_form,
        crate::inbound::http::topics::update_topic,
        crate::inbound::http::topics::confirm_topic_deletion,
        crate::inbound::http::topics::delete_topic,
        crate::inbound::http::topics::move_topic,
        crate::inbound::http::topics::post_comment,
        crate::inbound::http::ratings::rate_topic,
        crate::inbound::http::favorites::toggle_favorite,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::manage_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::get_category,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        RegisterRequest,
        UserResponse,
        TopicFormRequest,
        TopicUpdateRequest,
        MoveTopicRequest,
        CommentRequest,
        RateRequest,
        TopicResponse,
        TopicRecordResponse,
        TopicSummaryResponse,
        TopicIndexResponse,
        TopicDetailsResponse,
        TopicEditFormResponse,
        CommentResponse,
        RatingResponse,
        FavoriteResponse,
        CategoryRequest,
        CategoryResponse,
        CategoryOverviewResponse,
    )),
    tags(
        (name = "users", description = "Registration, sessions and the current user"),
        (name = "topics", description = "Topics, comments, ratings and favorites"),
        (name = "categories", description = "Category listing and administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // utoipa replaces :: with . in schema names.
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[rstest]
    fn error_schema_exposes_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let Some(RefOr::T(Schema::Object(error))) = schemas.get(ERROR_SCHEMA_NAME) else {
            panic!("expected Error object schema");
        };

        assert!(error.properties.contains_key("code"));
        assert!(error.properties.contains_key("message"));
        assert!(error.properties.contains_key("traceId"));
    }

    #[rstest]
    #[case("/api/v1/topics")]
    #[case("/api/v1/topics/{topic_id}/rating")]
    #[case("/api/v1/topics/{topic_id}/favorite")]
    #[case("/api/v1/categories/{category_id}")]
    #[case("/api/v1/register")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}

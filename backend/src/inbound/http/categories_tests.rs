//! Tests for the category handlers.

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use crate::domain::CATEGORY_IN_USE_MESSAGE;
use crate::inbound::http::test_utils::{forum_app, signed_in};
use crate::test_support::ForumFixture;

#[actix_web::test]
async fn listing_is_public_and_sorted_by_name() {
    let fixture = ForumFixture::new();
    fixture.add_category("Plumbing").await;
    fixture.add_category("Carpentry").await;
    let app = test::init_service(forum_app(fixture.http_state())).await;

    let body: Vec<Value> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/v1/categories").to_request(),
    )
    .await;

    let names: Vec<_> = body
        .iter()
        .filter_map(|category| category.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, ["Carpentry", "Plumbing"]);
}

#[actix_web::test]
async fn members_cannot_create_categories() {
    let fixture = ForumFixture::new();
    let member = fixture.add_member("Ada", "Lovelace").await;
    let app = test::init_service(forum_app(fixture.http_state())).await;
    let cookie = signed_in!(&app, &member);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/categories")
            .cookie(cookie)
            .set_json(json!({ "name": "Roofing" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn anonymous_callers_must_sign_in_to_manage() {
    let fixture = ForumFixture::new();
    let app = test::init_service(forum_app(fixture.http_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/categories/manage")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admins_create_and_rename_categories() {
    let fixture = ForumFixture::new();
    let admin = fixture.add_admin().await;
    let app = test::init_service(forum_app(fixture.http_state())).await;
    let cookie = signed_in!(&app, admin.user_id());

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/categories")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Roofing", "icon": "roof" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(created).await;
    let id = created
        .get("id")
        .and_then(Value::as_str)
        .expect("category id");

    let renamed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/categories/{id}"))
            .cookie(cookie)
            .set_json(json!({ "name": "Roofs and gutters" }))
            .to_request(),
    )
    .await;

    assert_eq!(
        renamed.get("name").and_then(Value::as_str),
        Some("Roofs and gutters")
    );
    assert_eq!(renamed.get("icon"), Some(&Value::Null));
}

#[actix_web::test]
async fn invalid_names_echo_the_submitted_form() {
    let fixture = ForumFixture::new();
    let admin = fixture.add_admin().await;
    let app = test::init_service(forum_app(fixture.http_state())).await;
    let cookie = signed_in!(&app, admin.user_id());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/categories")
            .cookie(cookie)
            .set_json(json!({ "name": "  ", "icon": "x" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body.pointer("/details/fields/name").is_some());
    assert_eq!(
        body.pointer("/details/input/icon").and_then(Value::as_str),
        Some("x")
    );
}

#[actix_web::test]
async fn deleting_a_category_in_use_is_a_conflict() {
    let fixture = ForumFixture::new();
    let admin = fixture.add_admin().await;
    let owner = fixture.add_member("Ada", "Lovelace").await;
    let plumbing = fixture.add_category("Plumbing").await;
    fixture
        .add_topic(&owner, "Leaky faucet", Some(plumbing))
        .await;
    let app = test::init_service(forum_app(fixture.http_state())).await;
    let cookie = signed_in!(&app, admin.user_id());

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/categories/{plumbing}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(CATEGORY_IN_USE_MESSAGE)
    );
    assert_eq!(
        body.pointer("/details/topicCount").and_then(Value::as_u64),
        Some(1)
    );
    assert!(fixture.store().has_category(&plumbing));
}

#[actix_web::test]
async fn unused_categories_are_deleted() {
    let fixture = ForumFixture::new();
    let admin = fixture.add_admin().await;
    let painting = fixture.add_category("Painting").await;
    let app = test::init_service(forum_app(fixture.http_state())).await;
    let cookie = signed_in!(&app, admin.user_id());

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/categories/{painting}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(!fixture.store().has_category(&painting));
}

#[actix_web::test]
async fn manage_view_counts_topics() {
    let fixture = ForumFixture::new();
    let admin = fixture.add_admin().await;
    let owner = fixture.add_member("Ada", "Lovelace").await;
    let plumbing = fixture.add_category("Plumbing").await;
    fixture
        .add_topic(&owner, "Leaky faucet", Some(plumbing))
        .await;
    fixture
        .add_topic(&owner, "Clogged drain", Some(plumbing))
        .await;
    let app = test::init_service(forum_app(fixture.http_state())).await;
    let cookie = signed_in!(&app, admin.user_id());

    let body: Vec<Value> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/categories/manage")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(body.len(), 1);
    assert_eq!(
        body.first()
            .and_then(|entry| entry.get("topicCount"))
            .and_then(Value::as_u64),
        Some(2)
    );
}

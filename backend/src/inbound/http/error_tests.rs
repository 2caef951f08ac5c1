//! Status mapping and payload redaction for HTTP errors.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::{CATEGORY_IN_USE_MESSAGE, Error};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn render(error: Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let payload = serde_json::from_slice(&bytes).expect("error JSON deserialises");
    (status, header, payload)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("sign in"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("not yours"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("stale"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_follows_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_trace(trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, payload) = render(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(trace_id.as_str()));
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn blocked_category_deletes_explain_themselves(trace_id: String) {
    let error = Error::conflict(CATEGORY_IN_USE_MESSAGE)
        .with_trace_id(trace_id)
        .with_details(json!({"topicCount": 2}));

    let (status, _, payload) = render(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(payload.message(), CATEGORY_IN_USE_MESSAGE);
    assert_eq!(payload.details(), Some(&json!({"topicCount": 2})));
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_ids_omit_the_header() {
    let error = Error::invalid_request("bad").with_details(json!({"fields": {"title": "required"}}));

    let (status, header, payload) = render(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(header.is_none());
    assert_eq!(payload.trace_id(), None);
    assert_eq!(payload.details(), Some(&json!({"fields": {"title": "required"}})));
}

#[rstest]
fn actix_errors_become_generic_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

//! Translation of driven-port failures into domain errors.
//!
//! Connection failures become `service_unavailable` so clients can retry;
//! query failures become `internal_error` and are redacted at the edge.
//! Constraint variants are mapped by the calling service where they carry
//! meaning, so the arms here only cover what is left.

use serde_json::json;

use super::Error;
use super::ports::{
    CategoryRepositoryError, CommentRepositoryError, FavoriteRepositoryError, PasswordHashError,
    TopicRepositoryError, UserRepositoryError, VoteRepositoryError,
};

pub(crate) fn topic_not_found() -> Error {
    Error::not_found("topic not found")
}

fn unknown_session_user() -> Error {
    Error::unauthorized("session user no longer exists")
}

pub(crate) fn category_not_found() -> Error {
    Error::not_found("category not found")
}

pub(crate) fn revision_conflict(expected: u32, actual: u32) -> Error {
    Error::conflict("the topic was changed by someone else; reload and try again").with_details(
        json!({
            "code": "revision_mismatch",
            "expectedRevision": expected,
            "actualRevision": actual,
        }),
    )
}

pub(crate) fn map_topic_error(error: TopicRepositoryError) -> Error {
    match error {
        TopicRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("topic repository unavailable: {message}"))
        }
        TopicRepositoryError::Query { message } => {
            Error::internal(format!("topic repository error: {message}"))
        }
        TopicRepositoryError::CategoryNotFound => category_not_found(),
        TopicRepositoryError::RevisionMismatch { expected, actual } => {
            revision_conflict(expected, actual)
        }
        TopicRepositoryError::NotFound => topic_not_found(),
    }
}

pub(crate) fn map_category_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category repository error: {message}"))
        }
        CategoryRepositoryError::InUse => {
            Error::conflict(super::category::CATEGORY_IN_USE_MESSAGE)
        }
    }
}

pub(crate) fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::TopicNotFound => topic_not_found(),
    }
}

pub(crate) fn map_vote_error(error: VoteRepositoryError) -> Error {
    match error {
        VoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("vote repository unavailable: {message}"))
        }
        VoteRepositoryError::Query { message } => {
            Error::internal(format!("vote repository error: {message}"))
        }
        VoteRepositoryError::DuplicateVote => {
            Error::conflict("a concurrent rating is in progress; try again")
        }
        VoteRepositoryError::TopicNotFound => topic_not_found(),
        VoteRepositoryError::UserNotFound => unknown_session_user(),
    }
}

pub(crate) fn map_favorite_error(error: FavoriteRepositoryError) -> Error {
    match error {
        FavoriteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("favorite repository unavailable: {message}"))
        }
        FavoriteRepositoryError::Query { message } => {
            Error::internal(format!("favorite repository error: {message}"))
        }
        FavoriteRepositoryError::DuplicateFavorite => {
            Error::conflict("a concurrent favorite change is in progress; try again")
        }
        FavoriteRepositoryError::TopicNotFound => topic_not_found(),
        FavoriteRepositoryError::UserNotFound => unknown_session_user(),
    }
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail => {
            Error::conflict("an account with this email already exists")
        }
        UserRepositoryError::UserNotFound => Error::not_found("user not found"),
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(map_vote_error(VoteRepositoryError::connection("refused")), ErrorCode::ServiceUnavailable)]
    #[case(map_vote_error(VoteRepositoryError::query("syntax")), ErrorCode::InternalError)]
    #[case(map_vote_error(VoteRepositoryError::topic_not_found()), ErrorCode::NotFound)]
    #[case(map_favorite_error(FavoriteRepositoryError::topic_not_found()), ErrorCode::NotFound)]
    #[case(map_topic_error(TopicRepositoryError::not_found()), ErrorCode::NotFound)]
    #[case(map_topic_error(TopicRepositoryError::revision_mismatch(1_u32, 2_u32)), ErrorCode::Conflict)]
    #[case(map_category_error(CategoryRepositoryError::in_use()), ErrorCode::Conflict)]
    #[case(map_user_error(UserRepositoryError::duplicate_email()), ErrorCode::Conflict)]
    fn maps_port_errors_to_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn revision_conflict_names_both_revisions() {
        let error = revision_conflict(3, 4);
        let details = error.details().expect("details");
        assert_eq!(details["expectedRevision"], 3);
        assert_eq!(details["actualRevision"], 4);
    }
}

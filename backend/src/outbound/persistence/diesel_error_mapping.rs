//! Classification of Diesel failures shared by every repository.
//!
//! Each adapter implements `From<DbFailure>` for its port error so `?` does
//! the mapping. Constraint names come from `backend/migrations`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::models::InvalidRow;
use super::pool::PoolError;

pub(crate) const TOPICS_CATEGORY_FK: &str = "topics_category_id_fkey";
pub(crate) const COMMENTS_TOPIC_FK: &str = "comments_topic_id_fkey";
pub(crate) const VOTES_TOPIC_FK: &str = "votes_topic_id_fkey";
pub(crate) const VOTES_USER_FK: &str = "votes_user_id_fkey";
pub(crate) const FAVORITES_TOPIC_FK: &str = "favorites_topic_id_fkey";
pub(crate) const FAVORITES_USER_FK: &str = "favorites_user_id_fkey";

/// What went wrong, reduced to the cases adapters distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    Connection(String),
    Query(String),
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { constraint: Option<String> },
}

impl DbFailure {
    /// Whether this is a foreign key violation on `constraint`.
    pub(crate) fn violates(&self, constraint: &str) -> bool {
        matches!(
            self,
            Self::ForeignKeyViolation { constraint: Some(name) } if name == constraint
        )
    }

    /// Message for the generic connection/query variants.
    pub(crate) fn into_message(self) -> String {
        match self {
            Self::Connection(message) | Self::Query(message) => message,
            Self::UniqueViolation { constraint } => {
                format!("unique constraint violated: {}", constraint_label(constraint))
            }
            Self::ForeignKeyViolation { constraint } => {
                format!("foreign key violated: {}", constraint_label(constraint))
            }
        }
    }
}

fn constraint_label(constraint: Option<String>) -> String {
    constraint.unwrap_or_else(|| "unnamed".to_owned())
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        Self::Connection(error.into_message())
    }
}

impl From<InvalidRow> for DbFailure {
    fn from(error: InvalidRow) -> Self {
        Self::Query(error.to_string())
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            ),
            _ => debug!(error = %error, "diesel operation failed"),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection closed".to_owned())
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

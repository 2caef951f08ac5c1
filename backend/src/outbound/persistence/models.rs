//! Diesel row structs and their conversion into domain types.
//!
//! Rows never leave the persistence layer. Stored text is re-validated on the
//! way out so a hand-edited row surfaces as a query failure instead of an
//! invalid domain value.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::user::display_name;
use crate::domain::{
    Category, CategoryId, CategoryName, Comment, CommentBody, CommentId, CommentRecord,
    EmailAddress, Favorite, FavoriteId, MediaUrl, PersonName, Topic, TopicDescription, TopicId,
    TopicRecord, TopicTitle, User, UserId, Vote, VoteId,
};

use super::schema::{categories, comments, favorites, topics, user_roles, users, votes};

/// A stored value that no longer satisfies domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {column} is invalid: {reason}")]
pub(crate) struct InvalidRow {
    column: &'static str,
    reason: String,
}

impl InvalidRow {
    fn new(column: &'static str, reason: impl ToString) -> Self {
        Self {
            column,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub joined_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<(User, String), InvalidRow> {
        let user = User {
            id: UserId::from_uuid(self.id),
            email: EmailAddress::new(&self.email).map_err(|err| InvalidRow::new("email", err))?,
            first_name: PersonName::new(&self.first_name)
                .map_err(|err| InvalidRow::new("first_name", err))?,
            last_name: PersonName::new(&self.last_name)
                .map_err(|err| InvalidRow::new("last_name", err))?,
            joined_at: self.joined_at,
        };
        Ok((user, self.password_hash))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct NewUserRoleRow<'a> {
    pub user_id: Uuid,
    pub role: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = InvalidRow;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::from_uuid(row.id),
            name: CategoryName::new(&row.name).map_err(|err| InvalidRow::new("name", err))?,
            icon: row.icon,
        })
    }
}

/// Insert and update share one shape: every column but the key is written.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CategoryChanges<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub icon: Option<&'a str>,
}

impl<'a> From<&'a Category> for CategoryChanges<'a> {
    fn from(category: &'a Category) -> Self {
        Self {
            id: *category.id.as_uuid(),
            name: category.name.as_str(),
            icon: category.icon.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = topics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TopicRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub revision: i32,
}

impl TryFrom<TopicRow> for Topic {
    type Error = InvalidRow;

    fn try_from(row: TopicRow) -> Result<Self, Self::Error> {
        let media_url = row
            .media_url
            .as_deref()
            .map(MediaUrl::new)
            .transpose()
            .map_err(|err| InvalidRow::new("media_url", err))?;
        Ok(Self {
            id: TopicId::from_uuid(row.id),
            title: TopicTitle::new(&row.title).map_err(|err| InvalidRow::new("title", err))?,
            description: TopicDescription::new(&row.description)
                .map_err(|err| InvalidRow::new("description", err))?,
            media_url,
            created_at: row.created_at,
            owner_id: UserId::from_uuid(row.user_id),
            category_id: row.category_id.map(CategoryId::from_uuid),
            revision: revision_from_db(row.revision)?,
        })
    }
}

/// A topic joined with its author's names and its category name.
pub(crate) type TopicJoinRow = (TopicRow, (String, String), Option<String>);

pub(crate) fn topic_record_from_row(
    (topic, (first_name, last_name), category_name): TopicJoinRow,
) -> Result<TopicRecord, InvalidRow> {
    Ok(TopicRecord {
        topic: Topic::try_from(topic)?,
        author_name: display_name(&first_name, &last_name),
        category_name,
    })
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = topics)]
pub(crate) struct NewTopicRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub media_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub revision: i32,
}

impl<'a> NewTopicRow<'a> {
    pub(crate) fn from_topic(topic: &'a Topic) -> Result<Self, InvalidRow> {
        Ok(Self {
            id: *topic.id.as_uuid(),
            title: topic.title.as_str(),
            description: topic.description.as_str(),
            media_url: topic.media_url.as_ref().map(MediaUrl::as_str),
            created_at: topic.created_at,
            user_id: *topic.owner_id.as_uuid(),
            category_id: topic.category_id.as_ref().map(|id| *id.as_uuid()),
            revision: revision_for_db(topic.revision)?,
        })
    }
}

/// Mutable topic columns. The author and creation time never change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = topics)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TopicChanges<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub media_url: Option<&'a str>,
    pub category_id: Option<Uuid>,
    pub revision: i32,
}

impl<'a> TopicChanges<'a> {
    pub(crate) fn from_topic(topic: &'a Topic) -> Result<Self, InvalidRow> {
        Ok(Self {
            title: topic.title.as_str(),
            description: topic.description.as_str(),
            media_url: topic.media_url.as_ref().map(MediaUrl::as_str),
            category_id: topic.category_id.as_ref().map(|id| *id.as_uuid()),
            revision: revision_for_db(topic.revision)?,
        })
    }
}

pub(crate) fn revision_for_db(revision: u32) -> Result<i32, InvalidRow> {
    i32::try_from(revision).map_err(|err| InvalidRow::new("revision", err))
}

pub(crate) fn revision_from_db(revision: i32) -> Result<u32, InvalidRow> {
    u32::try_from(revision).map_err(|err| InvalidRow::new("revision", err))
}

/// `COUNT(*)` results are never negative.
pub(crate) fn count_from_db(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn comment_record_from_row(
    (row, (first_name, last_name)): (CommentRow, (String, String)),
) -> Result<CommentRecord, InvalidRow> {
    let comment = Comment {
        id: CommentId::from_uuid(row.id),
        topic_id: TopicId::from_uuid(row.topic_id),
        author_id: UserId::from_uuid(row.user_id),
        content: CommentBody::new(&row.content).map_err(|err| InvalidRow::new("content", err))?,
        created_at: row.created_at,
    };
    Ok(CommentRecord {
        comment,
        author_name: display_name(&first_name, &last_name),
    })
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub user_id: Uuid,
    pub content: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Comment> for NewCommentRow<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            topic_id: *comment.topic_id.as_uuid(),
            user_id: *comment.author_id.as_uuid(),
            content: comment.content.as_str(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VoteRow {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub user_id: Uuid,
    pub is_liked: bool,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Self {
            id: VoteId::from_uuid(row.id),
            topic_id: TopicId::from_uuid(row.topic_id),
            user_id: UserId::from_uuid(row.user_id),
            is_liked: row.is_liked,
        }
    }
}

impl From<&Vote> for VoteRow {
    fn from(vote: &Vote) -> Self {
        Self {
            id: *vote.id.as_uuid(),
            topic_id: *vote.topic_id.as_uuid(),
            user_id: *vote.user_id.as_uuid(),
            is_liked: vote.is_liked,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FavoriteRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: FavoriteId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            topic_id: TopicId::from_uuid(row.topic_id),
            created_at: row.created_at,
        }
    }
}

impl From<&Favorite> for FavoriteRow {
    fn from(favorite: &Favorite) -> Self {
        Self {
            id: *favorite.id.as_uuid(),
            user_id: *favorite.user_id.as_uuid(),
            topic_id: *favorite.topic_id.as_uuid(),
            created_at: favorite.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn topic_row(title: &str, revision: i32) -> TopicRow {
        TopicRow {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            description: "Kitchen tap drips all night...".to_owned(),
            media_url: Some("https://example.com/tap.jpg".to_owned()),
            created_at: Utc.with_ymd_and_hms(2026, 2, 2, 10, 0, 0).single().expect("valid timestamp"),
            user_id: Uuid::new_v4(),
            category_id: None,
            revision,
        }
    }

    #[rstest]
    fn topic_rows_become_topics() {
        let row = topic_row("Leaky faucet", 3);
        let id = row.id;

        let topic = Topic::try_from(row).expect("valid row");

        assert_eq!(topic.id.as_uuid(), &id);
        assert_eq!(topic.title.as_str(), "Leaky faucet");
        assert_eq!(topic.revision, 3);
        assert_eq!(
            topic.media_url.as_ref().map(MediaUrl::as_str),
            Some("https://example.com/tap.jpg")
        );
    }

    #[rstest]
    #[case::blank_title(topic_row("   ", 1), "title")]
    #[case::negative_revision(topic_row("Leaky faucet", -1), "revision")]
    fn corrupt_topic_rows_are_rejected(#[case] row: TopicRow, #[case] column: &str) {
        let err = Topic::try_from(row).expect_err("corrupt row");

        assert!(err.to_string().starts_with(&format!("stored {column}")));
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(0, 0)]
    #[case(7, 7)]
    fn counts_never_go_negative(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(count_from_db(raw), expected);
    }

    #[rstest]
    fn joined_rows_carry_display_names() {
        let record = topic_record_from_row((
            topic_row("Leaky faucet", 1),
            ("Ada".to_owned(), "Lovelace".to_owned()),
            Some("Plumbing".to_owned()),
        ))
        .expect("valid row");

        assert_eq!(record.author_name, "Ada Lovelace");
        assert_eq!(record.category_name.as_deref(), Some("Plumbing"));
    }

    #[rstest]
    fn malformed_emails_fail_user_conversion() {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: "not-an-email".to_owned(),
            password_hash: "hash".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            joined_at: Utc::now(),
        };

        assert!(row.into_user().is_err());
    }
}

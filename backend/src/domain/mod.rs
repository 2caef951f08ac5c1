//! Forum domain: entities, policies and the services behind the ports.
//!
//! Nothing here knows about HTTP or SQL. Services depend on driven ports
//! declared in [`ports`] and report failures as [`Error`].

pub mod account_service;
pub mod auth;
pub mod authorization;
pub mod bootstrap;
pub mod category;
pub mod category_service;
pub mod comment;
pub mod error;
pub mod favorite;
pub mod favorite_service;
mod ids;
mod port_errors;
pub mod ports;
pub mod rating;
pub mod rating_service;
pub mod topic;
pub mod topic_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration};
pub use self::authorization::{Actor, Role, UnknownRole, can_modify, ensure_admin, ensure_can_modify};
pub use self::bootstrap::{
    AdminAccount, AdminSeed, BootstrapOutcome, BootstrapPlan, DEFAULT_CATEGORIES,
    ForumBootstrapper, default_category_drafts,
};
pub use self::category::{
    CATEGORY_IN_USE_MESSAGE, Category, CategoryDeletion, CategoryDraft, CategoryName,
    CategoryOverview, CategoryValidationError,
};
pub use self::category_service::CategoryService;
pub use self::comment::{Comment, CommentBody, CommentRecord, EmptyComment};
pub use self::error::{Error, ErrorCode, FieldError, FieldErrors};
pub use self::favorite::{Favorite, FavoriteToggle};
pub use self::favorite_service::FavoriteService;
pub use self::ids::{CategoryId, CommentId, FavoriteId, TopicId, UserId, VoteId};
pub use self::rating::{RateTopicRequest, RatingTally, Vote};
pub use self::rating_service::RatingService;
pub use self::topic::{
    DEFAULT_SHORT_DESCRIPTION_LIMIT, ELLIPSIS, MediaUrl, Topic, TopicDescription, TopicDetails,
    TopicDraft, TopicEditForm, TopicIndex, TopicRecord, TopicSummary, TopicTitle,
    TopicValidationError, UpdateTopicRequest, short_description,
};
pub use self::topic_service::{TopicRepositories, TopicService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, PersonName, User, UserValidationError};

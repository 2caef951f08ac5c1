//! Domain ports.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`]) are implemented by
//! domain services and called by inbound adapters. Driven ports
//! (`*Repository`, [`PasswordHasher`]) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod categories_command;
mod categories_query;
mod category_repository;
mod comment_repository;
mod favorite_repository;
mod favorites_command;
mod login_service;
mod password_hasher;
mod rating_command;
mod topic_repository;
mod topics_command;
mod topics_query;
mod user_repository;
mod vote_repository;

pub use categories_command::CategoriesCommand;
pub use categories_query::CategoriesQuery;
pub use category_repository::{CategoryRepository, CategoryRepositoryError};
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use favorite_repository::{FavoriteRepository, FavoriteRepositoryError};
pub use favorites_command::FavoritesCommand;
pub use login_service::{IdentityQuery, LoginService, RegistrationCommand};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use rating_command::RatingCommand;
pub use topic_repository::{TopicRepository, TopicRepositoryError};
pub use topics_command::TopicsCommand;
pub use topics_query::TopicsQuery;
pub use user_repository::{UserAccount, UserRepository, UserRepositoryError};
pub use vote_repository::{VoteRepository, VoteRepositoryError};

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use topic_repository::MockTopicRepository;
#[cfg(test)]
pub use vote_repository::MockVoteRepository;

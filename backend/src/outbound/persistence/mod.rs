//! PostgreSQL adapters for the forum's driven ports.
//!
//! Diesel row structs and the table definitions stay private to this module;
//! each repository translates rows into domain types and Diesel failures into
//! its port error. Connections come from a shared `bb8` pool over
//! `diesel-async`.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new(database_url)).await?;
//! run_pending_migrations(database_url).await?;
//! let topics = DieselTopicRepository::new(pool.clone());
//! ```

mod diesel_category_repository;
mod diesel_comment_repository;
mod diesel_error_mapping;
mod diesel_favorite_repository;
mod diesel_topic_repository;
mod diesel_user_repository;
mod diesel_vote_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_favorite_repository::DieselFavoriteRepository;
pub use diesel_topic_repository::DieselTopicRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vote_repository::DieselVoteRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

//! Driven port for accounts and role membership.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        Connection { message: String } => "user repository connection failed: {message}",
        Query { message: String } => "user repository query failed: {message}",
        DuplicateEmail => "an account with this email already exists",
        UserNotFound => "user not found",
    }
}

/// A user together with the stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    async fn roles_for(&self, id: &UserId) -> Result<Vec<Role>, UserRepositoryError>;

    /// Grant `role`; returns `false` when the user already held it.
    async fn grant_role(&self, id: &UserId, role: Role) -> Result<bool, UserRepositoryError>;
}

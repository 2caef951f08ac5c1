//! Driving ports for sign-in, registration and identity resolution.

use async_trait::async_trait;

use crate::domain::{Actor, Error, LoginCredentials, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Wrong email and wrong password fail identically with `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}

/// Resolves the session user into an [`Actor`] for policy checks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Fails with `unauthorized` when the account no longer exists.
    async fn actor_for(&self, user_id: &UserId) -> Result<Actor, Error>;

    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}

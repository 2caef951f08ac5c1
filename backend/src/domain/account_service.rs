//! Registration, sign-in and identity resolution.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::port_errors::{map_hash_error, map_user_error};
use super::ports::{
    IdentityQuery, LoginService, PasswordHasher, RegistrationCommand, UserAccount, UserRepository,
};
use super::{Actor, Error, LoginCredentials, Registration, User, UserId};

#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    pub fn new(users: Arc<U>, hasher: Arc<dyn PasswordHasher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        // A malformed address cannot belong to any account.
        let Ok(email) = super::EmailAddress::new(credentials.email()) else {
            return Err(invalid_credentials());
        };
        let Some(account) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown email");
            return Err(invalid_credentials());
        };
        if self
            .hasher
            .verify(credentials.password(), &account.password_hash)
        {
            Ok(account.user.id)
        } else {
            debug!(user_id = %account.user.id, "login with wrong password");
            Err(invalid_credentials())
        }
    }
}

#[async_trait]
impl<U> RegistrationCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let Registration {
            first_name,
            last_name,
            email,
            ..
        } = registration;
        let user = User {
            id: UserId::random(),
            email,
            first_name,
            last_name,
            joined_at: self.clock.utc(),
        };
        self.users
            .insert(&UserAccount {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U> IdentityQuery for AccountService<U>
where
    U: UserRepository,
{
    async fn actor_for(&self, user_id: &UserId) -> Result<Actor, Error> {
        self.profile(user_id).await?;
        let roles = self
            .users
            .roles_for(user_id)
            .await
            .map_err(map_user_error)?;
        Ok(Actor::new(*user_id, roles))
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }
}

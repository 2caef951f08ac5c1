//! PostgreSQL-backed `UserRepository`.
//!
//! Emails are stored already normalised by [`crate::domain::EmailAddress`], so
//! lookups compare them verbatim. Roles live in `user_roles` as their
//! canonical names; unknown names are skipped with a warning.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserAccount, UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, Role, User, UserId};

use super::diesel_error_mapping::DbFailure;
use super::models::{NewUserRoleRow, NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{user_roles, users};

const USERS_EMAIL_KEY: &str = "users_email_key";
const USER_ROLES_USER_FK: &str = "user_roles_user_id_fkey";

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for UserRepositoryError {
    fn from(failure: DbFailure) -> Self {
        if failure.violates(USER_ROLES_USER_FK) {
            return Self::user_not_found();
        }
        match failure {
            DbFailure::UniqueViolation { constraint }
                if constraint.as_deref() == Some(USERS_EMAIL_KEY) =>
            {
                Self::duplicate_email()
            }
            DbFailure::Connection(message) => Self::connection(message),
            other => Self::query(other.into_message()),
        }
    }
}

fn into_account(row: UserRow) -> Result<UserAccount, UserRepositoryError> {
    let (user, password_hash) = row.into_user().map_err(DbFailure::from)?;
    Ok(UserAccount {
        user,
        password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let user = &account.user;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_str(),
            password_hash: &account.password_hash,
            first_name: user.first_name.as_str(),
            last_name: user.last_name.as_str(),
            joined_at: user.joined_at,
        };
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DbFailure::from)?;
        Ok(row.map(into_account).transpose()?.map(|account| account.user))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DbFailure::from)?;
        row.map(into_account).transpose()
    }

    async fn roles_for(&self, id: &UserId) -> Result<Vec<Role>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let names: Vec<String> = user_roles::table
            .filter(user_roles::user_id.eq(*id.as_uuid()))
            .order(user_roles::role.asc())
            .select(user_roles::role)
            .load(&mut conn)
            .await
            .map_err(DbFailure::from)?;

        Ok(names
            .into_iter()
            .filter_map(|name| match name.parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    warn!(user_id = %id, role = %err.0, "ignoring unknown stored role");
                    None
                }
            })
            .collect())
    }

    async fn grant_role(&self, id: &UserId, role: Role) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(DbFailure::from)?;

        let inserted = diesel::insert_into(user_roles::table)
            .values(NewUserRoleRow {
                user_id: *id.as_uuid(),
                role: role.as_str(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(DbFailure::from)?;
        Ok(inserted > 0)
    }
}

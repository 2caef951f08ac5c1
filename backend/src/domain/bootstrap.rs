//! Idempotent start-up initialisation.
//!
//! Ensures the configured administrator account exists with the `Admin` role
//! and that the default categories are present. Running it again against an
//! initialised store changes nothing.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use zeroize::Zeroizing;

use super::port_errors::{map_category_error, map_hash_error, map_user_error};
use super::ports::{
    CategoryRepository, PasswordHasher, UserAccount, UserRepository, UserRepositoryError,
};
use super::{
    Category, CategoryDraft, CategoryId, EmailAddress, Error, PersonName, Role, User, UserId,
};

/// Categories seeded on a fresh install: name and icon reference.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Plumbing", "bi-droplet"),
    ("Electrical", "bi-lightning"),
    ("Carpentry", "bi-hammer"),
    ("Painting", "bi-brush"),
    ("Gardening", "bi-flower1"),
];

pub fn default_category_drafts() -> Vec<CategoryDraft> {
    DEFAULT_CATEGORIES
        .iter()
        .filter_map(|&(name, icon)| CategoryDraft::try_new(name, Some(icon)).ok())
        .collect()
}

/// Administrator account to guarantee at start-up.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: Zeroizing<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BootstrapPlan {
    pub admin: Option<AdminAccount>,
    pub categories: Vec<CategoryDraft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSeed {
    NotConfigured,
    Created,
    /// The account existed but lacked the role.
    RoleGranted,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub admin: AdminSeed,
    pub categories_created: usize,
}

impl BootstrapOutcome {
    pub fn changed_anything(&self) -> bool {
        self.categories_created > 0
            || matches!(self.admin, AdminSeed::Created | AdminSeed::RoleGranted)
    }
}

pub struct ForumBootstrapper<U, C> {
    users: Arc<U>,
    categories: Arc<C>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl<U, C> ForumBootstrapper<U, C>
where
    U: UserRepository,
    C: CategoryRepository,
{
    pub fn new(
        users: Arc<U>,
        categories: Arc<C>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            categories,
            hasher,
            clock,
        }
    }

    pub async fn run(&self, plan: &BootstrapPlan) -> Result<BootstrapOutcome, Error> {
        let admin = match &plan.admin {
            Some(account) => self.ensure_admin(account).await?,
            None => AdminSeed::NotConfigured,
        };
        let categories_created = self.ensure_categories(&plan.categories).await?;
        let outcome = BootstrapOutcome {
            admin,
            categories_created,
        };
        info!(admin = ?outcome.admin, categories_created, "bootstrap finished");
        Ok(outcome)
    }

    async fn ensure_admin(&self, account: &AdminAccount) -> Result<AdminSeed, Error> {
        if let Some(existing) = self.find_account(&account.email).await? {
            let granted = self.grant_admin(&existing.user.id).await?;
            return Ok(if granted {
                AdminSeed::RoleGranted
            } else {
                AdminSeed::Unchanged
            });
        }

        let password_hash = self
            .hasher
            .hash(account.password.as_str())
            .map_err(map_hash_error)?;
        let user = User {
            id: UserId::random(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            joined_at: self.clock.utc(),
        };
        let user_id = user.id;
        match self
            .users
            .insert(&UserAccount {
                user,
                password_hash,
            })
            .await
        {
            Ok(()) => {
                self.grant_admin(&user_id).await?;
                Ok(AdminSeed::Created)
            }
            // Another instance created it first.
            Err(UserRepositoryError::DuplicateEmail) => {
                let Some(existing) = self.find_account(&account.email).await? else {
                    return Err(Error::internal("administrator account vanished during bootstrap"));
                };
                self.grant_admin(&existing.user.id).await?;
                Ok(AdminSeed::Unchanged)
            }
            Err(err) => Err(map_user_error(err)),
        }
    }

    async fn find_account(&self, email: &EmailAddress) -> Result<Option<UserAccount>, Error> {
        self.users.find_by_email(email).await.map_err(map_user_error)
    }

    async fn grant_admin(&self, user_id: &UserId) -> Result<bool, Error> {
        self.users
            .grant_role(user_id, Role::Admin)
            .await
            .map_err(map_user_error)
    }

    async fn ensure_categories(&self, drafts: &[CategoryDraft]) -> Result<usize, Error> {
        let mut created = 0;
        for draft in drafts {
            let existing = self
                .categories
                .find_by_name(&draft.name)
                .await
                .map_err(map_category_error)?;
            if existing.is_some() {
                continue;
            }
            let category = Category::from_draft(CategoryId::random(), draft.clone());
            self.categories
                .insert(&category)
                .await
                .map_err(map_category_error)?;
            created += 1;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CategoryRepository as _;
    use crate::test_support::{ForumFixture, PlainTextHasher, fixed_clock};

    fn plan() -> BootstrapPlan {
        BootstrapPlan {
            admin: Some(AdminAccount {
                email: EmailAddress::new("admin@homecraft.com").expect("email"),
                first_name: PersonName::new("System").expect("name"),
                last_name: PersonName::new("Administrator").expect("name"),
                password: Zeroizing::new("AdminPassword123!".to_owned()),
            }),
            categories: default_category_drafts(),
        }
    }

    fn bootstrapper(
        fixture: &ForumFixture,
    ) -> ForumBootstrapper<crate::outbound::memory::InMemoryForum, crate::outbound::memory::InMemoryForum>
    {
        ForumBootstrapper::new(
            fixture.store(),
            fixture.store(),
            Arc::new(PlainTextHasher),
            fixed_clock(),
        )
    }

    #[tokio::test]
    async fn first_run_creates_admin_and_categories() {
        let fixture = ForumFixture::new();
        let outcome = bootstrapper(&fixture).run(&plan()).await.expect("bootstrap");

        assert_eq!(outcome.admin, AdminSeed::Created);
        assert_eq!(outcome.categories_created, DEFAULT_CATEGORIES.len());
        let email = EmailAddress::new("admin@homecraft.com").expect("email");
        let admin = fixture.store().account_by_email(&email).expect("admin account");
        assert!(fixture.store().user_roles(&admin.user.id).contains(&Role::Admin));
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let fixture = ForumFixture::new();
        let boot = bootstrapper(&fixture);
        boot.run(&plan()).await.expect("first run");

        let again = boot.run(&plan()).await.expect("second run");

        assert!(!again.changed_anything());
        assert_eq!(again.admin, AdminSeed::Unchanged);
        let categories = fixture.store().list().await.expect("categories");
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
    }

    #[tokio::test]
    async fn existing_account_is_promoted() {
        let fixture = ForumFixture::new();
        let email = EmailAddress::new("admin@homecraft.com").expect("email");
        let user_id = fixture.add_member_with_email("System", "Administrator", &email).await;

        let outcome = bootstrapper(&fixture)
            .run(&BootstrapPlan {
                categories: Vec::new(),
                ..plan()
            })
            .await
            .expect("bootstrap");

        assert_eq!(outcome.admin, AdminSeed::RoleGranted);
        assert_eq!(outcome.categories_created, 0);
        assert!(fixture.store().user_roles(&user_id).contains(&Role::Admin));
    }

    #[tokio::test]
    async fn empty_plan_touches_nothing() {
        let fixture = ForumFixture::new();
        let outcome = bootstrapper(&fixture)
            .run(&BootstrapPlan::default())
            .await
            .expect("bootstrap");
        assert_eq!(outcome.admin, AdminSeed::NotConfigured);
        assert!(!outcome.changed_anything());
    }
}

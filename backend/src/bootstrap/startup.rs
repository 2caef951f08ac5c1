//! Start-up bootstrap orchestration.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::bootstrap::config::{BootstrapConfigError, BootstrapSettings};
use crate::domain::ports::{CategoryRepository, PasswordHasher, UserRepository};
use crate::domain::{BootstrapOutcome, Error, ForumBootstrapper};

/// Errors returned while bootstrapping at start-up.
#[derive(Debug, Error)]
pub enum StartupBootstrapError {
    #[error("invalid bootstrap settings: {0}")]
    Config(#[from] BootstrapConfigError),
    #[error("bootstrap failed: {0}")]
    Run(#[from] Error),
}

/// Ensure the configured admin and default categories exist.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use homecraft::bootstrap::{BootstrapSettings, bootstrap_on_startup};
/// use homecraft::outbound::memory::InMemoryForum;
/// use homecraft::outbound::security::Argon2PasswordHasher;
/// use mockable::DefaultClock;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = BootstrapSettings {
///     admin_email: None,
///     admin_password: None,
///     admin_first_name: None,
///     admin_last_name: None,
///     seed_categories: true,
/// };
/// let store = Arc::new(InMemoryForum::new());
/// let outcome = bootstrap_on_startup(
///     &settings,
///     Arc::clone(&store),
///     store,
///     Arc::new(Argon2PasswordHasher::new()),
///     Arc::new(DefaultClock),
/// )
/// .await?;
/// assert_eq!(outcome.categories_created, 5);
/// # Ok(())
/// # }
/// ```
pub async fn bootstrap_on_startup<U, C>(
    settings: &BootstrapSettings,
    users: Arc<U>,
    categories: Arc<C>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
) -> Result<BootstrapOutcome, StartupBootstrapError>
where
    U: UserRepository,
    C: CategoryRepository,
{
    let plan = settings.plan()?;
    let bootstrapper = ForumBootstrapper::new(users, categories, hasher, clock);
    let outcome = bootstrapper.run(&plan).await?;

    if outcome.changed_anything() {
        info!(
            admin = ?outcome.admin,
            categories_created = outcome.categories_created,
            "bootstrap applied"
        );
    } else {
        info!("bootstrap already applied; skipping");
    }
    Ok(outcome)
}

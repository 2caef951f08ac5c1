//! Bootstrap configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::{
    AdminAccount, BootstrapPlan, EmailAddress, PASSWORD_MIN, PersonName, UserValidationError,
    default_category_drafts,
};

const DEFAULT_ADMIN_FIRST_NAME: &str = "System";
const DEFAULT_ADMIN_LAST_NAME: &str = "Administrator";

/// Settings read from `HOMECRAFT_BOOTSTRAP_*` variables.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOMECRAFT_BOOTSTRAP")]
pub struct BootstrapSettings {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_first_name: Option<String>,
    pub admin_last_name: Option<String>,
    /// Create the default categories that are missing.
    #[ortho_config(default = true)]
    pub seed_categories: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootstrapConfigError {
    #[error("admin email and admin password must be configured together")]
    IncompleteAdmin,
    #[error("invalid admin {field}: {source}")]
    InvalidAdmin {
        field: &'static str,
        #[source]
        source: UserValidationError,
    },
    #[error("admin password must be at least {PASSWORD_MIN} characters")]
    WeakPassword,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

fn person_name(
    value: Option<&String>,
    fallback: &str,
    field: &'static str,
) -> Result<PersonName, BootstrapConfigError> {
    PersonName::new(non_blank(value).unwrap_or(fallback))
        .map_err(|source| BootstrapConfigError::InvalidAdmin { field, source })
}

impl BootstrapSettings {
    /// Validate the settings into the plan the bootstrapper runs.
    ///
    /// # Errors
    ///
    /// Rejects half-configured or invalid administrator credentials.
    pub fn plan(&self) -> Result<BootstrapPlan, BootstrapConfigError> {
        let admin = self.admin_account()?;
        let categories = if self.seed_categories {
            default_category_drafts()
        } else {
            Vec::new()
        };
        Ok(BootstrapPlan { admin, categories })
    }

    fn admin_account(&self) -> Result<Option<AdminAccount>, BootstrapConfigError> {
        let email = non_blank(self.admin_email.as_ref());
        let password = self.admin_password.as_deref().filter(|pw| !pw.is_empty());
        let (email, password) = match (email, password) {
            (None, None) => return Ok(None),
            (Some(email), Some(password)) => (email, password),
            _ => return Err(BootstrapConfigError::IncompleteAdmin),
        };
        if password.chars().count() < PASSWORD_MIN {
            return Err(BootstrapConfigError::WeakPassword);
        }

        Ok(Some(AdminAccount {
            email: EmailAddress::new(email).map_err(|source| {
                BootstrapConfigError::InvalidAdmin {
                    field: "email",
                    source,
                }
            })?,
            first_name: person_name(
                self.admin_first_name.as_ref(),
                DEFAULT_ADMIN_FIRST_NAME,
                "first name",
            )?,
            last_name: person_name(
                self.admin_last_name.as_ref(),
                DEFAULT_ADMIN_LAST_NAME,
                "last name",
            )?,
            password: Zeroizing::new(password.to_owned()),
        }))
    }
}

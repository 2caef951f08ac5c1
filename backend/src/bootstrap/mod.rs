//! Start-up bootstrap: administrator account and default categories.

mod config;
mod startup;

pub use config::{BootstrapConfigError, BootstrapSettings};
pub use startup::{StartupBootstrapError, bootstrap_on_startup};

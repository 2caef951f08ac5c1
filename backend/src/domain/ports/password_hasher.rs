//! Driven port for password hashing.

use super::define_port_error;

define_port_error! {
    pub enum PasswordHashError {
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Whether `password` matches `hash`. Malformed hashes never match.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

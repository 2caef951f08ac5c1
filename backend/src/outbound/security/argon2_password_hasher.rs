//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are stored in PHC string format, so the salt and parameters travel
//! with the hash and stronger parameters can be introduced without a
//! migration.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(error = %err, "stored password hash is malformed");
                return false;
            }
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    #[rstest]
    fn hashes_verify_only_their_own_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("correct horse").expect("hash");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash));
        assert!(!hasher.verify("battery staple", &hash));
    }

    #[rstest]
    fn the_same_password_salts_differently(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("secret1").expect("hash");
        let second = hasher.hash("secret1").expect("hash");

        assert_ne!(first, second);
    }

    #[rstest]
    #[case("")]
    #[case("plain:secret1")]
    #[case("$argon2id$garbage")]
    fn malformed_hashes_never_match(hasher: Argon2PasswordHasher, #[case] stored: &str) {
        assert!(!hasher.verify("secret1", stored));
    }
}

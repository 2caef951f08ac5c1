//! Sign-in and registration inputs.
//!
//! Handlers build these from raw payload strings before calling a port, so
//! the services only ever see validated values. Passwords are held in
//! [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use super::error::FieldErrors;
use super::user::{EmailAddress, PersonName};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    EmptyEmail,
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated sign-in credentials.
///
/// # Examples
/// ```
/// use homecraft::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "secret")?;
/// assert_eq!(creds.email(), "ada@example.com");
/// # Ok::<(), homecraft::domain::LoginValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate every field, reporting all failures together.
    pub fn try_new(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let first = errors.collect("firstName", PersonName::new(first_name));
        let last = errors.collect("lastName", PersonName::new(last_name));
        let email = errors.collect("email", EmailAddress::new(email));
        if password.chars().count() < PASSWORD_MIN {
            errors.push(
                "password",
                format!("password must be at least {PASSWORD_MIN} characters"),
            );
        }

        match (first, last, email) {
            (Some(first_name), Some(last_name), Some(email)) if errors.is_empty() => Ok(Self {
                first_name,
                last_name,
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

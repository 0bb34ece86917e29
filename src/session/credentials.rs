use crate::session::errors::ValidationError;
use secrecy::{ExposeSecret, SecretString};

/// Minimum password length accepted before contacting the identity provider.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Email/password pair captured from a single submit. Never stored on the session.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Credentials that passed [`validate`]; the only input the gateway accepts.
#[derive(Debug)]
pub struct ValidCredentials {
    email: String,
    password: SecretString,
}

impl ValidCredentials {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// Checks the credentials in order, first failure wins:
/// both fields present, then password length in UTF-16 code units.
///
/// # Errors
/// Returns `EmptyFields` or `WeakPassword`.
pub fn validate(credentials: Credentials) -> Result<ValidCredentials, ValidationError> {
    let Credentials { email, password } = credentials;

    if email.is_empty() || password.expose_secret().is_empty() {
        return Err(ValidationError::EmptyFields);
    }

    if password.expose_secret().encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword);
    }

    Ok(ValidCredentials { email, password })
}

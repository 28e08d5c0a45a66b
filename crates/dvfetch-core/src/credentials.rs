//! API credentials, checked for presence before any request is made.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("missing username and password for the listing API")]
    MissingBoth,
    #[error("missing username for the listing API")]
    MissingUsername,
    #[error("missing password for the listing API")]
    MissingPassword,
}

/// Credentials as supplied on the command line or environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Credentials known to have both parts. Only obtainable through [`Credentials::validate`].
#[derive(Clone, PartialEq, Eq)]
pub struct ValidCredentials {
    username: String,
    password: String,
}

impl ValidCredentials {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for ValidCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Empty strings count as missing.
    pub fn validate(&self) -> Result<ValidCredentials, CredentialError> {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);
        match (present(&self.username), present(&self.password)) {
            (Some(username), Some(password)) => Ok(ValidCredentials { username, password }),
            (None, None) => Err(CredentialError::MissingBoth),
            (None, Some(_)) => Err(CredentialError::MissingUsername),
            (Some(_), None) => Err(CredentialError::MissingPassword),
        }
    }
}

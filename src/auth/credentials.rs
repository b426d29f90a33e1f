//! Where the login/password pair for the identity exchange comes from.

use crate::auth::error::AuthError;
use crate::config::{LOGIN_ENV_VAR, PASSWORD_ENV_VAR};
use log::debug;
use std::fmt;

/// Login and password registered with the HidroWebService.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Supplies credentials to the [`crate::TokenGuard`] each time it has to
/// authenticate. Sources are asked again on every refresh, so a source may
/// pick up rotated credentials.
pub trait CredentialSource: Send + Sync {
    fn credentials(&self) -> Result<Credentials, AuthError>;
}

/// A fixed credential pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credentials);

impl CredentialSource for StaticCredentials {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        Ok(self.0.clone())
    }
}

impl From<Credentials> for StaticCredentials {
    fn from(credentials: Credentials) -> Self {
        StaticCredentials(credentials)
    }
}

/// Reads credentials from environment variables, loading a `.env` file from
/// the working directory (or its parents) first when one exists.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    login_var: String,
    password_var: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(LOGIN_ENV_VAR, PASSWORD_ENV_VAR)
    }
}

impl EnvCredentials {
    pub fn new(login_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            login_var: login_var.into(),
            password_var: password_var.into(),
        }
    }

    fn read_var(name: &str) -> Result<String, AuthError> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            Ok(_) => Err(AuthError::CredentialsNotFound(format!(
                "environment variable '{name}' is empty"
            ))),
            Err(_) => Err(AuthError::CredentialsNotFound(format!(
                "environment variable '{name}' is not set"
            ))),
        }
    }
}

impl CredentialSource for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        let login = Self::read_var(&self.login_var)?;
        let password = Self::read_var(&self.password_var)?;
        Ok(Credentials::new(login, password))
    }
}

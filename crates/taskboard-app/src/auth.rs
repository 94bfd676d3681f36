//! Mock login: a fixed credential pair and an opaque session token.
//!
//! This stands in for a real identity provider so front-ends can exercise a login flow.
//! Nothing here is secret or secure.

use std::fmt;

use taskboard_core::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AuthConfig;

const TOKEN_PREFIX: &str = "mock-jwt-token-";

/// Login failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username or password does not match.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Token lacks the mock prefix.
    #[error("invalid session token")]
    InvalidToken,
}

/// Credential pair accepted by [`Credentials::verify`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<&AuthConfig> for Credentials {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

impl Credentials {
    /// Accept exactly this username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Username the login expects.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a login attempt and issue a token stamped with the clock's current time.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] when either field differs.
    pub fn verify<C: Clock>(
        &self,
        username: &str,
        password: &str,
        clock: &C,
    ) -> Result<SessionToken, AuthError> {
        if username != self.username || password != self.password {
            warn!(username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        let millis = clock.now().unix_timestamp_nanos() / 1_000_000;
        info!(username, "login accepted");
        Ok(SessionToken(format!("{TOKEN_PREFIX}{millis}")))
    }
}

/// Token handed out after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Accept any token carrying the mock prefix.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidToken`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let raw = raw.trim();
        if raw.starts_with(TOKEN_PREFIX) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(AuthError::InvalidToken)
        }
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

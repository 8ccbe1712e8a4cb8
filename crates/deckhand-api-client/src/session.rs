//! Session credentials.
//!
//! The client never stores a token. It asks its `SessionProvider` for one
//! before every request, so rotated or expired tokens are picked up.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Short-lived bearer token for the current session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no active session")]
    NoSession,

    #[error("session provider failed: {0}")]
    Provider(String),
}

/// Supplies the current session's bearer credential on demand.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_credential(&self) -> Result<Credential, SessionError>;
}

#[async_trait]
impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    async fn get_credential(&self) -> Result<Credential, SessionError> {
        (**self).get_credential().await
    }
}

/// Fixed token, or no session at all.
#[derive(Clone, Debug, Default)]
pub struct StaticSession {
    credential: Option<Credential>,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            credential: Some(Credential::new(token)),
        }
    }

    pub fn signed_out() -> Self {
        Self { credential: None }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn get_credential(&self) -> Result<Credential, SessionError> {
        self.credential.clone().ok_or(SessionError::NoSession)
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Clone, Debug)]
pub struct EnvSession {
    var: String,
}

impl EnvSession {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSession {
    fn default() -> Self {
        Self::new("DECKHAND_TOKEN")
    }
}

#[async_trait]
impl SessionProvider for EnvSession {
    async fn get_credential(&self) -> Result<Credential, SessionError> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(Credential::new(token.trim())),
            Ok(_) | Err(std::env::VarError::NotPresent) => Err(SessionError::NoSession),
            Err(e) => Err(SessionError::Provider(format!("{}: {}", self.var, e))),
        }
    }
}

//! Login, registration and session lookup.

use thiserror::Error;

use crate::session::{Identity, SessionState, SessionStore};
use crate::store::{StoreError, UserStore, UserStoreError};

/// Errors returned to a user trying to authenticate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password; the two are deliberately not told apart.
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username already taken!")]
    DuplicateUser(String),
    #[error("Username must not be empty")]
    InvalidUsername,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UserStoreError> for AuthError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::DuplicateUser(name) => AuthError::DuplicateUser(name),
            UserStoreError::InvalidUsername => AuthError::InvalidUsername,
            UserStoreError::Store(e) => AuthError::Store(e),
        }
    }
}

/// Maps credentials to sessions and sessions to identities.
#[derive(Debug)]
pub struct AuthGate {
    users: UserStore,
    sessions: SessionStore,
}

impl AuthGate {
    pub fn new(users: UserStore, sessions: SessionStore) -> Self {
        Self { users, sessions }
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Checks credentials and starts a session, returning its token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if !self.users.verify(username, password) {
            tracing::info!("Rejected login for {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("User {} logged in", username);
        Ok(self.sessions.create(Identity::new(username)))
    }

    /// Registers a new user and logs them in, returning the session token.
    pub fn register(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.users.register(username, password)?;
        Ok(self.sessions.create(Identity::new(username)))
    }

    /// Ends the session behind `token`, if any.
    pub fn logout(&self, token: &str) {
        if self.sessions.end(token) {
            tracing::debug!("Session ended");
        }
    }

    /// Resolves an optional session token.
    pub fn session(&self, token: Option<&str>) -> SessionState {
        token
            .map(|t| self.sessions.resolve(t))
            .unwrap_or_default()
    }
}

//! Server-side sessions mapping opaque tokens to identities.
//!
//! Sessions live in memory and expire after a configurable time.

use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// The authenticated username that scopes all record access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a request is acting as.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Upper bound on session lifetime; keeps expiry arithmetic in range.
const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Data associated with a live session.
#[derive(Debug, Clone)]
struct SessionData {
    identity: Identity,
    expires_at: Instant,
}

/// In-memory session store with expiry.
///
/// Thread-safe via internal RwLock.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates a store whose sessions last `ttl_minutes`.
    pub fn new(ttl_minutes: u64) -> Self {
        Self::with_ttl(Duration::from_secs(ttl_minutes.saturating_mul(60)))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: ttl.min(MAX_TTL),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a session for `identity` and returns its token
    /// (32 bytes, base64url encoded).
    ///
    /// Expired sessions are swept on every call.
    pub fn create(&self, identity: Identity) -> String {
        self.cleanup_expired();

        let token = generate_token();
        let data = SessionData {
            identity,
            expires_at: Instant::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(token.clone(), data);

        token
    }

    /// Resolves a token to the session state it represents.
    ///
    /// Unknown and expired tokens resolve to [`SessionState::Anonymous`];
    /// an expired entry is dropped.
    pub fn resolve(&self, token: &str) -> SessionState {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            match sessions.get(token) {
                None => return SessionState::Anonymous,
                Some(data) if now <= data.expires_at => {
                    return SessionState::Authenticated(data.identity.clone());
                }
                Some(_) => {}
            }
        }

        self.end(token);
        SessionState::Anonymous
    }

    /// Ends a session. Returns false if the token was unknown.
    pub fn end(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(token).is_some()
    }

    /// Removes all expired sessions.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, data| data.expires_at >= now);
        before - sessions.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(7 * 24 * 60)
    }
}

fn generate_token() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_create_and_resolve() {
        let store = SessionStore::new(10);

        let token = store.create(Identity::new("alice"));

        assert_eq!(
            store.resolve(&token),
            SessionState::Authenticated(Identity::new("alice"))
        );
    }

    #[test]
    fn test_tokens_are_unique_and_url_safe() {
        let store = SessionStore::new(10);

        let token1 = store.create(Identity::new("alice"));
        let token2 = store.create(Identity::new("alice"));

        assert_ne!(token1, token2);
        assert_eq!(token1.len(), 43);
        assert!(token1
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_unknown_token_is_anonymous() {
        let store = SessionStore::new(10);

        let state = store.resolve("nonexistent-token");

        assert_eq!(state, SessionState::Anonymous);
        assert!(state.identity().is_none());
    }

    #[test]
    fn test_end_session() {
        let store = SessionStore::new(10);
        let token = store.create(Identity::new("alice"));

        assert!(store.end(&token));
        assert!(!store.end(&token));
        assert_eq!(store.resolve(&token), SessionState::Anonymous);
    }

    #[test]
    fn test_expired_session_is_anonymous_and_dropped() {
        let store = SessionStore::with_ttl(Duration::from_secs(0));
        let token = store.create(Identity::new("alice"));

        thread::sleep(Duration::from_millis(10));

        assert_eq!(store.resolve(&token), SessionState::Anonymous);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::with_ttl(Duration::from_secs(0));
        store.create(Identity::new("a"));

        thread::sleep(Duration::from_millis(10));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 0);
        assert_eq!(store.cleanup_expired(), 0);
    }

    #[test]
    fn test_create_sweeps_expired_sessions() {
        let store = SessionStore::with_ttl(Duration::from_secs(0));
        store.create(Identity::new("a"));

        thread::sleep(Duration::from_millis(10));
        store.create(Identity::new("b"));

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ttl_is_capped() {
        let store = SessionStore::new(u64::MAX);

        assert_eq!(store.ttl(), MAX_TTL);
        let token = store.create(Identity::new("alice"));
        assert!(store.resolve(&token).is_authenticated());
    }

    #[test]
    fn test_session_state_helpers() {
        let state = SessionState::Authenticated(Identity::new("bob"));

        assert!(state.is_authenticated());
        assert_eq!(state.identity().map(Identity::as_str), Some("bob"));
        assert!(!SessionState::default().is_authenticated());
    }
}

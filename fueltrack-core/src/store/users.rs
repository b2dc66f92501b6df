//! User credential store.
//!
//! # Document Format
//!
//! ```text
//! {
//!   "alice": "her-password",
//!   "bob": "his-password"
//! }
//! ```
//!
//! Passwords are stored and compared as plain text. An entry whose password
//! is not a string never verifies, but it is kept when the file is rewritten.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use super::{load_or_default, save_atomic, write_guard, StoreError, USERS_FILE};

/// Errors that can occur when registering a user.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// The username is already registered.
    #[error("Username already taken: {0}")]
    DuplicateUser(String),
    /// The username is empty or whitespace.
    #[error("Username must not be empty")]
    InvalidUsername,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Mapping of username to password backed by one JSON file.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store backed by `users.json` in `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(USERS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every credential. A missing or corrupt file yields an empty map.
    ///
    /// Non-string passwords are rendered as their JSON text.
    pub fn load_all(&self) -> BTreeMap<String, String> {
        self.load_entries()
            .into_iter()
            .map(|(username, password)| {
                let password = match password {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (username, password)
            })
            .collect()
    }

    fn load_entries(&self) -> BTreeMap<String, Value> {
        load_or_default(&self.path)
    }

    /// Registers a new user.
    ///
    /// Fails with [`UserStoreError::DuplicateUser`] if the username exists,
    /// leaving the stored credential untouched.
    pub fn register(&self, username: &str, password: &str) -> Result<(), UserStoreError> {
        if username.trim().is_empty() {
            return Err(UserStoreError::InvalidUsername);
        }

        let _guard = write_guard(&self.write_lock);

        let mut users = self.load_entries();
        if users.contains_key(username) {
            return Err(UserStoreError::DuplicateUser(username.to_string()));
        }

        users.insert(username.to_string(), Value::from(password));
        save_atomic(&self.path, &users)?;

        tracing::info!("Registered user {}", username);
        Ok(())
    }

    /// Returns true iff `username` exists and its password matches exactly.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.load_entries()
            .get(username)
            .and_then(Value::as_str)
            .is_some_and(|stored| stored == password)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.load_entries().contains_key(username)
    }

    /// Returns all usernames in sorted order.
    pub fn usernames(&self) -> Vec<String> {
        self.load_entries().into_keys().collect()
    }
}

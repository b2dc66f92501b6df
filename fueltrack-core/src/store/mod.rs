//! JSON file stores for meal records and user credentials.
//!
//! Each store owns a single file in the data directory:
//! ```text
//! <DATA_DIR>/
//!   meals.json
//!   users.json
//! ```
//!
//! Files are read in full on every access and replaced in full on every
//! write. A missing or corrupt file reads as an empty collection.

mod meals;
mod users;

pub use meals::MealStore;
pub use users::{UserStore, UserStoreError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use thiserror::Error;

/// File name of the meal record store.
pub const MEALS_FILE: &str = "meals.json";
/// File name of the user credential store.
pub const USERS_FILE: &str = "users.json";

/// Errors that can occur while persisting a store.
///
/// Loading never fails; only writes surface errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error for {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize {}: {}", .path.display(), .source)]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and parses a JSON file, falling back to `T::default()` when the file
/// is absent or cannot be parsed.
pub(crate) fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse {}, treating as empty: {}", path.display(), e);
                T::default()
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No {} found, treating as empty", path.display());
            T::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read {}, treating as empty: {}", path.display(), e);
            T::default()
        }
    }
}

/// Replaces the contents of `path` with the pretty-printed JSON of `value`.
///
/// Writes to a uniquely named temp file in the same directory and renames it
/// into place, so readers see either the old or the new contents and never a
/// partial file, even with several processes writing at once.
pub(crate) fn save_atomic<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(&bytes).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}

/// Acquires a store's write lock. A panic in another writer does not leave
/// the file half-written, so a poisoned lock is still usable.
pub(crate) fn write_guard(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{load_or_default, save_atomic, write_guard, StoreError, MEALS_FILE};
use crate::models::MealRecord;

/// Append-only collection of meal records backed by one JSON file.
///
/// Every call goes to disk; nothing is cached between calls. Load-modify-save
/// cycles are serialized through an internal lock so concurrent appends within
/// one process cannot drop each other's records.
///
/// Writes operate on the stored rows as raw JSON, so a row this version cannot
/// read is carried through unchanged instead of being dropped.
#[derive(Debug)]
pub struct MealStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MealStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store backed by `meals.json` in `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(MEALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record, in stored order.
    ///
    /// A missing or corrupt file yields an empty list. Rows that are not
    /// records at all are skipped.
    pub fn load_all(&self) -> Vec<MealRecord> {
        self.load_rows()
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping unreadable row in {}: {}", self.path.display(), e);
                    None
                }
            })
            .collect()
    }

    fn load_rows(&self) -> Vec<Value> {
        load_or_default(&self.path)
    }

    /// Loads the records owned by `username`, preserving stored order.
    pub fn load_owned_by(&self, username: &str) -> Vec<MealRecord> {
        self.load_all()
            .into_iter()
            .filter(|record| record.is_owned_by(username))
            .collect()
    }

    /// Replaces the whole collection.
    pub fn save_all(&self, records: &[MealRecord]) -> Result<(), StoreError> {
        let _guard = write_guard(&self.write_lock);
        save_atomic(&self.path, records)
    }

    /// Adds one record to the end of the collection.
    pub fn append(&self, record: MealRecord) -> Result<(), StoreError> {
        let _guard = write_guard(&self.write_lock);

        let row = serde_json::to_value(&record).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;

        let mut rows = self.load_rows();
        rows.push(row);
        save_atomic(&self.path, &rows)
    }

    /// Removes every record owned by `username`, keeping all others in their
    /// original relative order.
    ///
    /// Returns the number of records removed.
    pub fn delete_by_owner(&self, username: &str) -> Result<usize, StoreError> {
        let _guard = write_guard(&self.write_lock);

        let mut rows = self.load_rows();
        let before = rows.len();
        rows.retain(|row| !row_is_owned_by(row, username));
        let removed = before - rows.len();

        save_atomic(&self.path, &rows)?;
        Ok(removed)
    }
}

/// Ownership test on a raw row. Agrees with [`MealRecord::is_owned_by`]:
/// only a string `username` names an owner.
fn row_is_owned_by(row: &Value, username: &str) -> bool {
    row.get("username").and_then(Value::as_str) == Some(username)
}

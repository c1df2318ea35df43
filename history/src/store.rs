//! Persistent store adapter: one well-known JSON slot on disk.
//!
//! The slot holds the full serialized history sequence. Reads fail soft:
//! an absent or malformed slot is "no history", never an error. Writes
//! replace the slot atomically (temp file + rename).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::atomic_write::atomic_write;
use crate::entry::HistoryEntry;

/// Well-known slot file name.
const SLOT_FILENAME: &str = "history.json";

/// Application subdirectory under the platform data directory.
const APP_DIR: &str = "offcut";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no platform data directory available")]
    DataDirUnavailable,
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// File-backed store for the history slot.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Open the store at the platform-default slot location
    /// (`{data_dir}/offcut/history.json`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DataDirUnavailable` when the platform exposes
    /// no data directory, or an IO error if the directory cannot be
    /// created.
    pub fn open_default() -> Result<Self, StoreError> {
        let base = dirs::data_dir().ok_or(StoreError::DataDirUnavailable)?;
        let dir = base.join(APP_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.join(SLOT_FILENAME),
        })
    }

    /// Open the store at an explicit slot path (tests, config override).
    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the slot, treating absence and malformed content as empty.
    #[must_use]
    pub fn load(&self) -> Vec<HistoryEntry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read history slot: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Malformed history slot, treating as empty: {e}"
                );
                Vec::new()
            }
        }
    }

    /// Replace the slot with the full serialized sequence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on serialization or IO failure. The slot is
    /// never left partially written.
    pub fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let content = serde_json::to_string(entries)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write(&self.path, content.as_bytes())?;
        Ok(())
    }

    /// Remove the slot entirely. Removing an absent slot is not an error.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offcut_types::CalculationResult;
    use pretty_assertions::assert_eq;

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::at_path(dir.path().join("history.json"))
    }

    fn entry(print_type: &str, print_run: u32, waste_amount: u32) -> HistoryEntry {
        let result = CalculationResult::new(print_type, print_run, waste_amount, None, false)
            .expect("valid input");
        HistoryEntry::from_result(&result)
    }

    #[test]
    fn absent_slot_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn malformed_slot_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        fs::write(store.path(), "{not json").expect("write garbage");

        assert!(store.load().is_empty());
    }

    #[test]
    fn wrong_shape_slot_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"print_type":"4/4"}"#).expect("write object");

        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let entries = vec![entry("4/4", 2000, 140), entry("2/0", 500, 30)];

        store.save(&entries).expect("save");
        assert_eq!(store.load(), entries);
    }

    #[test]
    fn save_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let entries = vec![entry("1/1", 800, 48)];

        store.save(&entries).expect("first save");
        let first = fs::read_to_string(store.path()).expect("read");
        store.save(&entries).expect("second save");
        let second = fs::read_to_string(store.path()).expect("read");

        assert_eq!(first, second);
    }

    #[test]
    fn clear_removes_slot_and_tolerates_absence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save(&[entry("4/0", 1000, 50)]).expect("save");
        store.clear().expect("clear");
        assert!(!store.path().exists());
        assert!(store.load().is_empty());

        // Second clear has the same observable effect.
        store.clear().expect("clear again");
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = HistoryStore::at_path(dir.path().join("nested").join("history.json"));

        store.save(&[entry("5/5", 6000, 240)]).expect("save");
        assert_eq!(store.load().len(), 1);
    }
}

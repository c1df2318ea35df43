//! The bounded most-recent-first calculation cache.
//!
//! New entries are prepended, so this is not a FIFO queue: the head is
//! always the latest calculation and eviction drops the oldest tail
//! entries once the capacity bound is hit. Eviction is triggered purely by
//! insertion count, never by access.
//!
//! The capacity bound is 5 by default (`HistorySettings::DEFAULT_CAPACITY`);
//! earlier revisions of the tool disagreed between 5 and 10, and the newer
//! bound won.

use thiserror::Error;

use offcut_types::CalculationResult;

use crate::entry::HistoryEntry;
use crate::store::HistoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Owner of the in-memory history sequence.
///
/// Every mutation persists the full sequence through the store before
/// returning, so callers always observe durable state. A failed persist is
/// logged and the in-memory mutation stands - the slot catches up on the
/// next successful write.
#[derive(Debug)]
pub struct HistoryCache {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    store: HistoryStore,
}

impl HistoryCache {
    /// Create an empty cache over the given store.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(store: HistoryStore, capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: Vec::new(),
            capacity,
            store,
        }
    }

    /// Rehydrate from the persistent slot and return the sequence for the
    /// initial render.
    ///
    /// A slot longer than the capacity bound (e.g. the bound was lowered
    /// between sessions) is truncated to the most recent entries.
    pub fn initialize(&mut self) -> &[HistoryEntry] {
        let mut entries = self.store.load();
        if entries.len() > self.capacity {
            tracing::debug!(
                loaded = entries.len(),
                capacity = self.capacity,
                "Persisted history exceeds capacity, truncating"
            );
            entries.truncate(self.capacity);
        }
        self.entries = entries;
        &self.entries
    }

    /// Exact-match scan on `(print_type, print_run)`.
    #[must_use]
    pub fn contains(&self, print_type: &str, print_run: u32) -> bool {
        self.entries
            .iter()
            .any(|e| e.matches(print_type, print_run))
    }

    /// Insert a calculation at the head.
    ///
    /// Duplicate suppression is enforced here: if an entry with the same
    /// `(print_type, print_run)` already exists, the sequence is returned
    /// unchanged. Callers that need to signal suppression check
    /// [`contains`](Self::contains) first.
    pub fn insert(&mut self, result: &CalculationResult) -> &[HistoryEntry] {
        if self.contains(&result.print_type, result.print_run) {
            return &self.entries;
        }

        self.entries.insert(0, HistoryEntry::from_result(result));
        self.entries.truncate(self.capacity);
        self.persist();
        &self.entries
    }

    /// Remove the entry at `index`, preserving the relative order of the
    /// rest.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::IndexOutOfRange` when `index >= len`. This is
    /// a caller bug (a stale or miscomputed index), so it propagates
    /// instead of being swallowed.
    pub fn remove_at(&mut self, index: usize) -> Result<&[HistoryEntry], HistoryError> {
        if index >= self.entries.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }

        self.entries.remove(index);
        self.persist();
        Ok(&self.entries)
    }

    /// Empty the sequence and remove the persistent slot.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear history slot: {e}");
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.entries) {
            tracing::warn!("Failed to persist history: {e}");
        }
    }
}

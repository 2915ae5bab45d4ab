//! A counter whose value lives in a [`KeyValueStore`].

use super::KeyValueStore;
use tracing::{debug, instrument, warn};

/// Integer counter initialised from, and written back to, a store key.
///
/// Every change is written through immediately. Write failures are logged
/// and otherwise ignored; the in-memory count stays authoritative.
#[derive(Debug)]
pub struct PersistentCounter<S> {
    store: S,
    key: String,
    count: i64,
    step: i64,
}

impl<S: KeyValueStore> PersistentCounter<S> {
    /// Reads `key` from `store`, falling back to `initial_count` when the
    /// value is missing, empty or not an integer, then writes the count back.
    #[instrument(skip(store, key), fields(key = %key.as_ref()))]
    pub fn open(store: S, key: impl AsRef<str>, initial_count: i64, step: i64) -> Self {
        let key = key.as_ref().to_string();
        let count = match store.get(&key) {
            Some(raw) => raw.trim().parse::<i64>().unwrap_or_else(|_| {
                debug!(raw = %raw, "Stored value is not an integer, using default");
                initial_count
            }),
            None => initial_count,
        };

        let mut counter = Self {
            store,
            key,
            count,
            step,
        };
        counter.sync();
        counter
    }

    /// Current count.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Amount added by each [`increment`](Self::increment).
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Store key the count is written to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds one step and writes the new count. Returns the new count.
    ///
    /// If the sum would overflow `i64`, the count stays where it is and
    /// nothing is written.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn increment(&mut self) -> i64 {
        match self.count.checked_add(self.step) {
            Some(next) => {
                self.count = next;
                self.sync();
            }
            None => {
                warn!(count = self.count, step = self.step, "Count would overflow, left unchanged");
            }
        }
        self.count
    }

    /// Gives back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn sync(&mut self) {
        if let Err(e) = self.store.set(&self.key, &self.count.to_string()) {
            warn!(error = %e, key = %self.key, "Failed to persist count");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            Some("7".to_string())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::new("read-only"))
        }
    }

    #[test]
    fn test_missing_key_uses_initial_count_and_writes_back() {
        let counter = PersistentCounter::open(MemoryStore::new(), "count", 5, 1);
        assert_eq!(counter.count(), 5);
        assert_eq!(counter.into_store().get("count"), Some("5".to_string()));
    }

    #[test]
    fn test_stored_value_wins_over_default() {
        let mut store = MemoryStore::new();
        store.set("count", "41").unwrap();
        let mut counter = PersistentCounter::open(store, "count", 0, 1);
        assert_eq!(counter.increment(), 42);
    }

    #[test]
    fn test_non_numeric_and_empty_fall_back() {
        for raw in ["", "abc", "1.5"] {
            let mut store = MemoryStore::new();
            store.set("count", raw).unwrap();
            let counter = PersistentCounter::open(store, "count", 3, 1);
            assert_eq!(counter.count(), 3, "raw value {:?}", raw);
        }
    }

    #[test]
    fn test_write_failures_do_not_surface() {
        let mut counter = PersistentCounter::open(ReadOnlyStore, "count", 0, 2);
        assert_eq!(counter.count(), 7);
        assert_eq!(counter.increment(), 9);
    }

    #[test]
    fn test_increment_at_max_leaves_count_unchanged() {
        let mut store = MemoryStore::new();
        store.set("count", &i64::MAX.to_string()).unwrap();
        let mut counter = PersistentCounter::open(store, "count", 0, 1);

        assert_eq!(counter.increment(), i64::MAX);
        assert_eq!(counter.count(), i64::MAX);
        assert_eq!(counter.into_store().get("count"), Some(i64::MAX.to_string()));
    }

    #[test]
    fn test_large_negative_step_stops_at_min() {
        let mut counter = PersistentCounter::open(MemoryStore::new(), "count", 0, i64::MIN);
        assert_eq!(counter.increment(), i64::MIN);
        assert_eq!(counter.increment(), i64::MIN);
    }
}

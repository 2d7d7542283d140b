//! Key-value store for anonymous-session data.
//!
//! Values are JSON blobs under fixed string keys. Operations are synchronous
//! and never suspend; last writer wins within the process. Corrupt stored
//! text is swallowed on read, logged, and treated as absent.

use std::sync::RwLock;

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::errors::KvError;

/// Synchronous key-value storage for anonymous-scope blobs.
#[derive(Debug, Default)]
pub struct KvStore {
    entries: RwLock<FxHashMap<String, String>>,
}

impl KvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the value under `key`.
    ///
    /// Returns `T::default()` when the key is absent, the stored text is
    /// unparsable, or the lock is poisoned. Failures are logged, never raised.
    pub fn read<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let Ok(entries) = self.entries.read() else {
            warn!(key, "key-value lock poisoned, reading as empty");
            return T::default();
        };

        let Some(raw) = entries.get(key) else {
            return T::default();
        };

        match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "discarding corrupt key-value entry");
                T::default()
            }
        }
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`KvError`] when serialization fails or the lock is poisoned.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let raw = serde_json::to_string(value).map_err(|source| KvError::Encode {
            key: key.to_string(),
            source,
        })?;

        let mut entries = self.entries.write().map_err(|_| KvError::LockPoisoned)?;
        entries.insert(key.to_string(), raw);

        Ok(())
    }

    /// Remove the value under `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.remove(key);
            }
            Err(_) => warn!(key, "key-value lock poisoned, remove skipped"),
        }
    }

    /// Whether a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store raw, possibly invalid text under `key`.
    ///
    /// Exists so tests can plant corrupt entries; production writers go
    /// through [`KvStore::write`].
    ///
    /// # Errors
    ///
    /// Returns a [`KvError`] when the lock is poisoned.
    #[doc(hidden)]
    pub fn write_raw(&self, key: &str, raw: &str) -> Result<(), KvError> {
        let mut entries = self.entries.write().map_err(|_| KvError::LockPoisoned)?;
        entries.insert(key.to_string(), raw.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn write_then_read_round_trips() -> TestResult {
        let store = KvStore::new();

        store.write("cart", &vec![1u32, 2, 3])?;

        assert_eq!(store.read::<Vec<u32>>("cart"), vec![1, 2, 3]);

        Ok(())
    }

    #[test]
    fn absent_key_reads_as_default() {
        let store = KvStore::new();

        assert_eq!(store.read::<Vec<u32>>("missing"), Vec::<u32>::new());
    }

    #[test]
    fn corrupt_entry_reads_as_default() -> TestResult {
        let store = KvStore::new();

        store.write_raw("cart", "{not json")?;

        assert_eq!(store.read::<Vec<u32>>("cart"), Vec::<u32>::new());

        Ok(())
    }

    #[test]
    fn remove_deletes_and_is_idempotent() -> TestResult {
        let store = KvStore::new();

        store.write("cart", &vec![1u32])?;
        store.remove("cart");
        store.remove("cart");

        assert!(!store.contains("cart"));
        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn overwrite_keeps_last_value() -> TestResult {
        let store = KvStore::new();

        store.write("cart", &vec![1u32])?;
        store.write("cart", &vec![2u32, 3])?;

        assert_eq!(store.read::<Vec<u32>>("cart"), vec![2, 3]);
        assert_eq!(store.len(), 1);

        Ok(())
    }
}

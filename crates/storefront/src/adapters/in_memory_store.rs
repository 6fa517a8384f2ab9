// Rust guideline compliant 2026-02-23

//! In-memory adapter for the `KeyValueStore` port.
//!
//! Models browser storage: string keys and values, with an optional byte quota
//! over all keys plus values. Returns `StorageError::QuotaExceeded` when a
//! write would cross it; nothing is written in that case.

use std::cell::RefCell;
use std::collections::HashMap;

use domain::{KeyValueStore, StorageError};

/// `KeyValueStore` adapter backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RefCell<HashMap<String, String>>,
    /// Maximum bytes across all keys and values. `None` means unbounded.
    quota: Option<usize>,
}

impl InMemoryStore {
    /// Create an empty store holding at most `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self { inner: RefCell::new(HashMap::new()), quota: Some(quota) }
    }

    /// Bytes currently used by keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.inner.borrow().iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    /// Replace `key`'s value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] if the new contents would not fit.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let current = self.inner.borrow().get(key).map_or(0, |old| key.len() + old.len());
            let after = self.used_bytes() - current + key.len() + value.len();
            if after > limit {
                return Err(StorageError::QuotaExceeded { limit });
            }
        }
        self.inner.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

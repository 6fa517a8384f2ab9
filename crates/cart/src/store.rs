// Rust guideline compliant 2026-02-23

//! Single-slot JSON adapter for the `CartStore` port.
//!
//! The whole cart lives under one key of a `KeyValueStore` as a JSON array of
//! flat `{id, title, price, thumbnail, quantity}` objects. No schema version is
//! stored; a format change is a breaking change.

use domain::{CartLine, CartStore, KeyValueStore, StorageError};

/// Slot key used by the storefront views.
pub const DEFAULT_SLOT_KEY: &str = "cart";

/// `CartStore` adapter serializing the cart into one key-value slot.
#[derive(Debug)]
pub struct SlotCartStore<K: KeyValueStore> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> SlotCartStore<K> {
    /// Use the [`DEFAULT_SLOT_KEY`] slot of `kv`.
    #[must_use]
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, DEFAULT_SLOT_KEY)
    }

    /// Use the `key` slot of `kv`.
    #[must_use]
    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    /// The slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The wrapped key-value store.
    #[must_use]
    pub fn inner(&self) -> &K {
        &self.kv
    }
}

impl<K: KeyValueStore> CartStore for SlotCartStore<K> {
    /// Read and decode the slot. Missing, unreadable, or malformed data all
    /// yield an empty cart; the latter two are logged.
    fn load(&self) -> Vec<CartLine> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cart_store.load.unavailable");
                return vec![];
            }
        };
        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cart_store.load.malformed");
                vec![]
            }
        }
    }

    /// Serialize `lines` and replace the slot in a single `set`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if encoding fails, otherwise
    /// whatever the key-value store reports.
    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let json = serde_json::to_string(lines)
            .map_err(|e| StorageError::Serialization { reason: e.to_string() })?;
        self.kv.set(&self.key, &json)
    }
}

// Rust guideline compliant 2026-02-27

//! Directory-backed adapter for the `KeyValueStore` port.
//!
//! One file per key (`<key>.json`). Writes go to a sibling temporary file that
//! is then renamed over the target, so a reader sees either the previous value
//! or the new one, never a partially written file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use domain::{KeyValueStore, StorageError};

/// `KeyValueStore` adapter persisting each key to its own file under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open `dir`, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::Unavailable {
            reason: format!("cannot create {}: {e}", dir.display()),
        })?;
        Ok(Self { dir })
    }

    /// The directory holding the key files.
    #[cfg(test)]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for `key`.
    ///
    /// Keys map one-to-one onto file names, so only non-empty
    /// `[A-Za-z0-9_-]` keys are accepted.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Unavailable {
                reason: format!("key {key:?} is not a valid slot name"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Unavailable {
                reason: format!("cannot read {}: {e}", path.display()),
            }),
        }
    }

    /// Write `value` to a temporary file, then rename it over `key`'s file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] for an invalid key or on any I/O
    /// failure; the previous value stays in place.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::Unavailable {
            reason: format!("cannot write {}: {e}", tmp.display()),
        })?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Unavailable {
            reason: format!("cannot replace {}: {e}", path.display()),
        })?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "file_store.set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FileStore;
    use domain::{KeyValueStore as _, StorageError};

    #[test]
    fn missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("cart", "[{\"id\":1}]").unwrap();
        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cart.json".to_owned()]);
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn keys_outside_the_slot_charset_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("a_b", "kept").unwrap();
        for key in ["a.b", "../escape", ""] {
            assert!(matches!(store.set(key, "x"), Err(StorageError::Unavailable { .. })), "key {key:?}");
            assert!(matches!(store.get(key), Err(StorageError::Unavailable { .. })), "key {key:?}");
        }
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("kept"));
    }
}

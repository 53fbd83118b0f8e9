//! Durable key/value storage behind the cart store.
//!
//! The store never touches a backend directly; it goes through
//! [`KeyValueStorage`], which has exactly three operations. Two backends ship
//! with the crate:
//!
//! - [`MemoryStorage`] - a process-local map, used by tests and throwaway runs
//! - [`FileStorage`] - one file per key in a data directory, surviving restarts

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The closed set of records the store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Serialized identity record of the logged-in user.
    User,
    /// Raw bearer token string.
    Token,
    /// Serialized ordered cart lines.
    Cart,
    /// Serialized ordered wishlist entries.
    Wishlist,
}

impl StorageKey {
    /// Every key, in load order.
    pub const ALL: [Self; 4] = [Self::User, Self::Token, Self::Cart, Self::Wishlist];

    /// Name of the record in the backing storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Token => "token",
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: &'static str,
        #[source]
        source: io::Error,
    },

    /// The backend refused the write (e.g. quota exceeded).
    #[error("write rejected for '{0}': {1}")]
    Rejected(&'static str, String),
}

/// Durable key/value storage.
///
/// Values are opaque strings; the store owns the encoding.
pub trait KeyValueStorage {
    /// Read a record. A missing record is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not be read.
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Write a record, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not complete.
    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Remove a record entirely. Removing an absent record succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but could not be removed.
    fn clear(&mut self, key: StorageKey) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage. Contents are lost when the value is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: HashMap<StorageKey, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, as if written by an earlier session.
    #[must_use]
    pub fn with_record(mut self, key: StorageKey, value: impl Into<String>) -> Self {
        self.records.insert(key, value.into());
        self
    }

    /// Whether a record exists for `key`.
    #[must_use]
    pub fn contains(&self, key: StorageKey) -> bool {
        self.records.contains_key(&key)
    }

    /// Raw stored value for `key`.
    #[must_use]
    pub fn get(&self, key: StorageKey) -> Option<&str> {
        self.records.get(&key).map(String::as_str)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(&key).cloned())
    }

    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.records.insert(key, value.to_owned());
        Ok(())
    }

    fn clear(&mut self, key: StorageKey) -> Result<(), StorageError> {
        self.records.remove(&key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Stores each record as `<dir>/<key>.json`.
///
/// Writes land in a temporary sibling first and are renamed into place, so
/// a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: "<dir>",
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// Directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl KeyValueStorage for FileStorage {
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.as_str(),
                source,
            }),
        }
    }

    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let io_err = |source: io::Error| StorageError::Io {
            key: key.as_str(),
            source,
        };

        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn clear(&mut self, key: StorageKey) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.as_str(),
                source,
            }),
        }
    }
}

//! Key-value persistence boundary.
//!
//! Every collection lives under one key as a JSON document. Reads are
//! forgiving: a missing key, a backend failure, or malformed JSON all come
//! back as `None` so callers fall back to an empty default. Writes report
//! their failures.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::ErrorCode;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Key holding the users collection.
pub const USERS_KEY: &str = "docket.users.v1";
/// Key holding the cases collection.
pub const CASES_KEY: &str = "docket.cases.v1";
/// Key holding the updates collection.
pub const UPDATES_KEY: &str = "docket.updates.v1";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Sqlite(_) | Self::Io(_) => ErrorCode::StoreWriteFailed,
            Self::Encode(_) => ErrorCode::InternalUnexpected,
        }
    }
}

/// Raw string storage. Implementations hold whole JSON documents per key.
pub trait KvStore {
    /// Read the raw value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Store several keys as one unit. Backends with transactions apply all
    /// entries or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set_raw(key, value)?;
        }
        Ok(())
    }
}

/// Typed JSON access over a [`KvStore`].
#[derive(Debug)]
pub struct Storage<S> {
    store: S,
}

impl<S: KvStore> Storage<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Decode the value at `key`. Never fails: unreadable or malformed data
    /// reads as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "store read failed; treating value as absent");
                return None;
            }
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "malformed stored JSON; treating value as absent");
                None
            }
        }
    }

    /// True when `key` holds nothing usable: missing, unreadable, malformed
    /// JSON, or a literal `null`. Valid JSON of any shape counts as present.
    pub fn is_vacant(&self, key: &str) -> bool {
        match self.store.get_raw(key) {
            Ok(Some(raw)) => !serde_json::from_str::<serde_json::Value>(&raw)
                .is_ok_and(|value| !value.is_null()),
            Ok(None) => true,
            Err(err) => {
                warn!(key, error = %err, "store read failed; treating value as vacant");
                true
            }
        }
    }

    /// Decode a list collection record by record. Records that do not decode
    /// are skipped with a warning; the rest are returned in stored order.
    pub fn get_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(records) = self.get::<Vec<serde_json::Value>>(key) else {
            return Vec::new();
        };
        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(key, index, error = %err, "skipping unreadable record");
                    None
                }
            })
            .collect()
    }

    /// Encode and store `value` at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        debug!(key, bytes = raw.len(), "store write");
        self.store.set_raw(key, &raw)
    }

    /// Store pre-encoded documents as one unit (see [`KvStore::set_many`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn set_encoded(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        debug!(keys = entries.len(), "store batch write");
        self.store.set_many(entries)
    }

    pub const fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Encode `value` for [`Storage::set_encoded`].
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let storage = Storage::new(MemoryStore::default());
        assert_eq!(storage.get::<Vec<String>>("absent"), None);
    }

    #[test]
    fn malformed_json_reads_as_none() {
        let mut store = MemoryStore::default();
        store.set_raw(CASES_KEY, "{not json").unwrap();
        let storage = Storage::new(store);
        assert_eq!(storage.get::<Vec<String>>(CASES_KEY), None);
    }

    #[test]
    fn literal_null_reads_as_none() {
        let mut store = MemoryStore::default();
        store.set_raw(CASES_KEY, "null").unwrap();
        let storage = Storage::new(store);
        assert_eq!(storage.get::<Vec<String>>(CASES_KEY), None);
    }

    #[test]
    fn wrong_shape_reads_as_none() {
        let mut store = MemoryStore::default();
        store.set_raw(CASES_KEY, r#"{"a": 1}"#).unwrap();
        let storage = Storage::new(store);
        assert_eq!(storage.get::<Vec<String>>(CASES_KEY), None);
    }

    #[test]
    fn vacancy_ignores_record_shape() {
        let mut store = MemoryStore::default();
        store.set_raw("null", "null").unwrap();
        store.set_raw("broken", "[{").unwrap();
        store.set_raw("odd", r#"[{"id": 7}]"#).unwrap();
        store.set_raw("empty", "[]").unwrap();
        let storage = Storage::new(store);

        assert!(storage.is_vacant("missing"));
        assert!(storage.is_vacant("null"));
        assert!(storage.is_vacant("broken"));
        assert!(!storage.is_vacant("odd"));
        assert!(!storage.is_vacant("empty"));
    }

    #[test]
    fn get_list_skips_records_that_do_not_decode() {
        let mut store = MemoryStore::default();
        store.set_raw(USERS_KEY, r#"["a", 7, "b", null]"#).unwrap();
        let storage = Storage::new(store);
        assert_eq!(storage.get_list::<String>(USERS_KEY), ["a", "b"]);
        assert!(storage.get_list::<String>("missing").is_empty());
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut storage = Storage::new(MemoryStore::default());
        storage.set(USERS_KEY, &vec!["a", "b"]).unwrap();
        assert_eq!(
            storage.get::<Vec<String>>(USERS_KEY),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn empty_list_is_present_not_absent() {
        let mut storage = Storage::new(MemoryStore::default());
        storage.set::<[String]>(UPDATES_KEY, &[]).unwrap();
        assert_eq!(storage.get::<Vec<String>>(UPDATES_KEY), Some(Vec::new()));
    }
}

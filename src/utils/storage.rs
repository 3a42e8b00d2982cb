use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use web_sys::window;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("browser storage is not available")]
    Unavailable,
    #[error("could not write `{0}` to storage")]
    Write(String),
    #[error("invalid json under `{key}`: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value storage with the semantics of the Web Storage API.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserStorage {
    Local,
    Session,
}

impl BrowserStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = window().ok_or(StorageError::Unavailable)?;
        let storage = match self {
            BrowserStorage::Local => window.local_storage(),
            BrowserStorage::Session => window.session_storage(),
        };
        storage.ok().flatten().ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Quota errors surface here as well.
        self.storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &raw)
}

#[cfg(test)]
pub mod memory {
    use super::{KeyValueStore, StorageError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MemoryStore {
        items: RefCell<HashMap<String, String>>,
    }

    impl KeyValueStore for MemoryStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.items.borrow().get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.items.borrow_mut().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    #[test]
    fn missing_key_loads_as_none() {
        let store = MemoryStore::default();
        let value: Option<Vec<u32>> = load_json(&store, "nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn corrupt_json_is_reported_with_its_key() {
        let store = MemoryStore::default();
        store.set_item("broken", "{not json").unwrap();
        let err = load_json::<Vec<u32>>(&store, "broken").unwrap_err();
        assert!(matches!(err, StorageError::Json { ref key, .. } if key == "broken"));
    }

    #[test]
    fn saved_values_can_be_loaded_back() {
        let store = MemoryStore::default();
        save_json(&store, "numbers", &vec![1u32, 2, 3]).unwrap();
        let value: Option<Vec<u32>> = load_json(&store, "numbers").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }
}

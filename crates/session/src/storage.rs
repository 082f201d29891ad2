//! Durable client-local key/value storage

use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// String key/value slots that survive a client reload
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Backend("storage lock poisoned".into())
}

/// In-process storage; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{Storage, StorageError, poisoned};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Entries kept as one JSON object on disk, rewritten on every change
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        entries: Mutex<HashMap<String, String>>,
    }

    impl FileStorage {
        /// Open the storage file, starting empty if it does not exist yet
        ///
        /// # Errors
        ///
        /// Returns an error if the file exists but cannot be read or parsed
        pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
            let path = path.into();
            let entries = match std::fs::read_to_string(&path) {
                Ok(content) if content.trim().is_empty() => HashMap::new(),
                Ok(content) => serde_json::from_str(&content)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
                Err(e) => return Err(e.into()),
            };
            tracing::debug!(path = %path.display(), entries = entries.len(), "opened session storage");

            Ok(Self {
                path,
                entries: Mutex::new(entries),
            })
        }

        /// Open the storage file in the platform data directory
        ///
        /// # Errors
        ///
        /// Returns `Backend` if no home directory can be determined, or any
        /// error from [`FileStorage::open`]
        pub fn open_default() -> Result<Self, StorageError> {
            let path = Self::default_path().ok_or_else(|| {
                StorageError::Backend("no data directory available for session storage".into())
            })?;
            Self::open(path)
        }

        /// `<data dir>/session.json` for this application
        pub fn default_path() -> Option<PathBuf> {
            directories::ProjectDirs::from("com", "saytrix", "saytrix")
                .map(|dirs| dirs.data_dir().join("session.json"))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let tmp = self.path.with_extension("json.tmp");
            std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl Storage for FileStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut entries = self.entries.lock().map_err(poisoned)?;
            let previous = entries.insert(key.to_string(), value.to_string());
            if let Err(e) = self.flush(&entries) {
                match previous {
                    Some(previous) => entries.insert(key.to_string(), previous),
                    None => entries.remove(key),
                };
                return Err(e);
            }
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            let mut entries = self.entries.lock().map_err(poisoned)?;
            if let Some(previous) = entries.remove(key) {
                if let Err(e) = self.flush(&entries) {
                    entries.insert(key.to_string(), previous);
                    return Err(e);
                }
            }
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{Storage, StorageError};
    use gloo::storage::Storage as _;

    /// Browser `localStorage`; values are stored as raw strings
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorage;

    fn js_error(e: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Backend(format!("localStorage: {e:?}"))
    }

    impl Storage for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            gloo::storage::LocalStorage::raw()
                .get_item(key)
                .map_err(js_error)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            gloo::storage::LocalStorage::raw()
                .set_item(key, value)
                .map_err(js_error)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            gloo::storage::LocalStorage::raw()
                .remove_item(key)
                .map_err(js_error)
        }
    }
}

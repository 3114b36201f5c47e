#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use ::log::error;
use serde::{Serialize, de::DeserializeOwned};

pub mod file_store;
pub mod log;
pub mod memory_store;
pub mod migration;
pub mod persistence;
pub mod settings;
pub mod snapshot;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use persistence::{App, Persistence};
pub use settings::{Settings, SettingsError, WeightUnit};

pub const KEY_STATE: &str = "state";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_LOG: &str = "log";

/// String key-value store holding JSON documents.
///
/// The typed accessors never fail. Errors are logged and reported as a missing value or as
/// `false`.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError>
    where
        Self: Sized,
    {
        match self.read(key)? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        self.try_load(key).unwrap_or_else(|err| {
            error!("failed to load {key}: {err}");
            None
        })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> bool
    where
        Self: Sized,
    {
        match serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|value| self.write(key, &value))
        {
            Ok(()) => true,
            Err(err) => {
                error!("failed to save {key}: {err}");
                false
            }
        }
    }

    fn remove(&self, key: &str)
    where
        Self: Sized,
    {
        if let Err(err) = self.delete(key) {
            error!("failed to remove {key}: {err}");
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

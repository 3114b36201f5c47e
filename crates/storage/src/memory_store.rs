use std::{collections::HashMap, sync::Mutex};

use crate::{KeyValueStore, StorageError};

/// Volatile store, used for the encrypted half of the state in tests and as a fallback when no
/// directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        let mut keys = entries.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        Ok(keys)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_write_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.read("a").unwrap(), None);
        store.write("a", "1").unwrap();
        store.write("b", "2").unwrap();
        store.write("a", "3").unwrap();
        assert_eq!(store.read("a").unwrap(), Some("3".to_string()));
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_load_save() {
        let store = MemoryStore::new();
        assert!(store.save("numbers", &vec![1, 2, 3]));
        assert_eq!(store.load::<Vec<u32>>("numbers"), Some(vec![1, 2, 3]));
        assert_eq!(store.load::<Vec<u32>>("missing"), None);
        store.write("invalid", "{").unwrap();
        assert_eq!(store.load::<Vec<u32>>("invalid"), None);
        assert!(store.try_load::<Vec<u32>>("invalid").is_err());
        store.remove("numbers");
        assert_eq!(store.load::<Vec<u32>>("numbers"), None);
    }
}

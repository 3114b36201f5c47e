use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{KeyValueStore, StorageError};

/// Store keeping one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_read_write_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data")).unwrap();
        assert_eq!(store.read("state").unwrap(), None);

        store.write("state", "{\"a\":1}").unwrap();
        assert_eq!(store.read("state").unwrap(), Some("{\"a\":1}".to_string()));
        assert!(store.root().join("state.json").exists());
        assert!(!store.root().join("state.json.tmp").exists());

        store.delete("state").unwrap();
        store.delete("state").unwrap();
        assert_eq!(store.read("state").unwrap(), None);
    }

    #[test]
    fn test_data_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileStore::new(dir.path()).unwrap().save("settings", &[1, 2]));
        assert_eq!(
            FileStore::new(dir.path()).unwrap().load::<Vec<u8>>("settings"),
            Some(vec![1, 2])
        );
    }

    #[rstest]
    #[case("")]
    #[case("../state")]
    #[case("a/b")]
    #[case("state.json")]
    fn test_invalid_key(#[case] key: &str) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.write(key, "1"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.read(key), Err(StorageError::InvalidKey(_))));
    }
}

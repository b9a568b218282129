//! File-backed key-value store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{KeyValueStore, StorageError};

/// Key-value store holding one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();

        fs::create_dir_all(&dir).await.map_err(StorageError::Io)?;

        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::Io(error)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        fs::write(&path, value).await.map_err(StorageError::Io)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StorageError::Io(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    async fn temp_store() -> Result<(tempfile::TempDir, FileStore), StorageError> {
        let dir = tempfile::tempdir().map_err(StorageError::Io)?;
        let store = FileStore::open(dir.path()).await?;

        Ok((dir, store))
    }

    #[tokio::test]
    async fn set_then_get_round_trips() -> TestResult {
        let (_dir, store) = temp_store().await?;

        store.set("cart_v1", "[]").await?;

        assert_eq!(store.get("cart_v1").await?, Some("[]".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() -> TestResult {
        let (_dir, store) = temp_store().await?;

        assert_eq!(store.get("auth_token").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() -> TestResult {
        let (_dir, store) = temp_store().await?;

        store.set("auth_token", "first").await?;
        store.set("auth_token", "second").await?;

        assert_eq!(store.get("auth_token").await?, Some("second".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn remove_deletes_and_tolerates_absence() -> TestResult {
        let (_dir, store) = temp_store().await?;

        store.set("auth_token", "tok").await?;
        store.remove("auth_token").await?;
        store.remove("auth_token").await?;

        assert_eq!(store.get("auth_token").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn rejects_path_traversal_keys() -> TestResult {
        let (_dir, store) = temp_store().await?;

        let result = store.get("../escape").await;

        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }
}

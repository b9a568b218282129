//! Local key-value persistence

mod file;

pub use file::FileStore;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

/// Storage key for the serialized cart snapshot.
pub const CART_SNAPSHOT_KEY: &str = "cart_v1";

/// Storage key for the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Errors from reading or writing local state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem failure.
    #[error("storage io error")]
    Io(#[source] std::io::Error),

    /// The key cannot be mapped to a storage location.
    #[error("storage key {0:?} is not a valid name")]
    InvalidKey(String),

    /// A value could not be encoded for storage.
    #[error("failed to encode value for storage")]
    Encode(#[source] serde_json::Error),
}

/// Durable string key-value storage for session state.
///
/// Mirrors the platform key-value store a mobile client would use: flat
/// string keys, whole-value reads and writes, no transactions.
#[automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the key is invalid or the backing
    /// store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the key is invalid or the write
    /// fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`; absent keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the key is invalid or the delete
    /// fails.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

//! Session token persistence.
//!
//! The backend issues an opaque bearer token at sign-in; this client
//! treats token presence as the authentication signal and never calls a
//! "who am I" endpoint. A 401 from any API call invalidates the stored
//! token via [`TokenStore::invalidate`].

use std::sync::Arc;

use crate::storage::{AUTH_TOKEN_KEY, KeyValueStore, StorageError};

/// Accessor for the persisted bearer token.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Create a token store over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be read.
    pub async fn load(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(AUTH_TOKEN_KEY).await
    }

    /// Persist a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be written.
    pub async fn save(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(AUTH_TOKEN_KEY, token).await
    }

    /// Drop the stored token, ending the local session.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be written.
    pub async fn invalidate(&self) -> Result<(), StorageError> {
        self.storage.remove(AUTH_TOKEN_KEY).await
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenStore")
    }
}

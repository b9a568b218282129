//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::api::ApiClient;
use crate::auth::TokenStore;
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::orders::OrdersApi;
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// Errors from building the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// Local storage could not be opened.
    #[error("failed to open local storage")]
    Storage(#[source] StorageError),
}

/// Shared service handles, constructed once at startup and passed to
/// consumers by clone.
#[derive(Clone)]
pub struct AppContext {
    /// Local key-value storage.
    pub storage: Arc<dyn KeyValueStore>,
    /// Session token accessor.
    pub tokens: TokenStore,
    /// Orders backend.
    pub orders: Arc<dyn OrdersApi>,
}

impl AppContext {
    /// Build the application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the local data directory cannot be opened.
    pub async fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::open(&config.storage.data_dir)
                .await
                .map_err(AppInitError::Storage)?,
        );

        let tokens = TokenStore::new(Arc::clone(&storage));
        let orders: Arc<dyn OrdersApi> =
            Arc::new(ApiClient::new(config.api.base_url.clone(), tokens.clone()));

        Ok(Self {
            storage,
            tokens,
            orders,
        })
    }

    /// Rehydrate the cart from this context's storage.
    pub async fn open_cart(&self) -> CartStore {
        CartStore::rehydrate(Arc::clone(&self.storage)).await
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

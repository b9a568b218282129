//! Cart store with durable snapshots.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::storage::{CART_SNAPSHOT_KEY, KeyValueStore, StorageError};

use super::models::{CartItem, NewCartItem};

/// Cart mutation failures.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart already holds items from a different restaurant; one cart
    /// maps to one order, and orders are single-restaurant.
    #[error("cart already holds items from another restaurant")]
    RestaurantMismatch {
        /// Restaurant the cart is currently bound to.
        existing: Option<String>,
    },
}

/// The client-side shopping cart.
///
/// In-memory state is authoritative for the session. Every mutation writes
/// a best-effort full snapshot to storage; a failed write is logged and
/// never rolls the mutation back. Insertion order of lines is preserved.
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Create an empty store without touching persisted state.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: Vec::new(),
            storage,
        }
    }

    /// Create a store from the persisted snapshot, if one exists.
    ///
    /// A missing, unreadable, or corrupt snapshot is non-fatal: the store
    /// starts empty and the failure is logged.
    pub async fn rehydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let items = match storage.get(CART_SNAPSHOT_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(error) => {
                    warn!(%error, "discarding unreadable cart snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "failed to load cart snapshot");
                Vec::new()
            }
        };

        Self { items, storage }
    }

    #[cfg(test)]
    pub(crate) fn with_items(storage: Arc<dyn KeyValueStore>, items: Vec<CartItem>) -> Self {
        Self { items, storage }
    }

    /// Add `quantity` of `item` to the cart.
    ///
    /// Items from a different restaurant than the cart's current one are
    /// rejected without changing state. Adding an item already in the cart
    /// increments its quantity. A `quantity` of zero is treated as 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::RestaurantMismatch`] on a cross-restaurant add.
    pub async fn add_item(&mut self, item: NewCartItem, quantity: u32) -> Result<(), CartError> {
        if let Some(first) = self.items.first() {
            if first.restaurant_id != item.restaurant_id {
                return Err(CartError::RestaurantMismatch {
                    existing: first.restaurant_id.clone(),
                });
            }
        }

        let quantity = quantity.max(1);

        if let Some(entry) = self
            .items
            .iter_mut()
            .find(|entry| entry.menu_item_id == item.menu_item_id)
        {
            entry.quantity += quantity;
        } else {
            self.items.push(item.into_item(quantity));
        }

        self.persist_best_effort().await;

        Ok(())
    }

    /// Remove the line with `menu_item_id`; absent ids are a no-op.
    pub async fn remove_item(&mut self, menu_item_id: &str) {
        self.items.retain(|entry| entry.menu_item_id != menu_item_id);
        self.persist_best_effort().await;
    }

    /// Set the quantity of an existing line. Zero removes the line; ids
    /// not in the cart are a no-op.
    pub async fn update_quantity(&mut self, menu_item_id: &str, quantity: u32) {
        if quantity == 0 {
            return self.remove_item(menu_item_id).await;
        }

        if let Some(entry) = self
            .items
            .iter_mut()
            .find(|entry| entry.menu_item_id == menu_item_id)
        {
            entry.quantity = quantity;
            self.persist_best_effort().await;
        }
    }

    /// Empty the cart, persisting the empty snapshot.
    pub async fn clear(&mut self) {
        self.items.clear();
        self.persist_best_effort().await;
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|entry| entry.price.times(entry.quantity))
            .sum()
    }

    /// The cart's lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Restaurant the cart is bound to, if any line carries one.
    #[must_use]
    pub fn restaurant_id(&self) -> Option<&str> {
        self.items
            .first()
            .and_then(|entry| entry.restaurant_id.as_deref())
    }

    /// Write the snapshot now, returning the outcome to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or writing the snapshot fails.
    pub async fn persist(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.items).map_err(StorageError::Encode)?;

        self.storage.set(CART_SNAPSHOT_KEY, &raw).await
    }

    /// Flush a final snapshot and release the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the final snapshot cannot be written.
    pub async fn dispose(self) -> Result<(), StorageError> {
        self.persist().await
    }

    async fn persist_best_effort(&self) {
        if let Err(error) = self.persist().await {
            warn!(%error, "failed to save cart snapshot");
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::prices::Price;
    use crate::storage::{FileStore, MockKeyValueStore};

    use super::*;

    fn menu_item(id: &str, price: &str, restaurant: Option<&str>) -> NewCartItem {
        NewCartItem {
            menu_item_id: id.to_string(),
            title: format!("Item {id}"),
            price: Price::parse(price).unwrap_or(Price::ZERO),
            restaurant_id: restaurant.map(str::to_string),
            ..NewCartItem::default()
        }
    }

    fn quiet_storage() -> Arc<dyn KeyValueStore> {
        let mut storage = MockKeyValueStore::new();
        storage.expect_set().returning(|_, _| Ok(()));
        storage.expect_get().returning(|_| Ok(None));

        Arc::new(storage)
    }

    #[tokio::test]
    async fn add_item_computes_total() -> TestResult {
        let mut cart = CartStore::new(quiet_storage());

        cart.add_item(menu_item("a", "6.5", Some("r1")), 2).await?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Decimal::from(13));

        Ok(())
    }

    #[tokio::test]
    async fn adding_existing_item_merges_quantities() -> TestResult {
        let mut cart = CartStore::new(quiet_storage());

        cart.add_item(menu_item("a", "6.5", Some("r1")), 1).await?;
        cart.add_item(menu_item("a", "6.5", Some("r1")), 2).await?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().map(|entry| entry.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn cross_restaurant_add_is_rejected_without_change() -> TestResult {
        let mut cart = CartStore::new(quiet_storage());

        cart.add_item(menu_item("a", "6.5", Some("r1")), 1).await?;
        let before = cart.items().to_vec();

        let result = cart.add_item(menu_item("b", "3.0", Some("r2")), 1).await;

        assert!(
            matches!(
                &result,
                Err(CartError::RestaurantMismatch { existing: Some(id) }) if id == "r1"
            ),
            "expected RestaurantMismatch, got {result:?}"
        );
        assert_eq!(cart.items(), before.as_slice());
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_zero_equals_remove() -> TestResult {
        let storage = quiet_storage();

        let mut removed = CartStore::new(Arc::clone(&storage));
        removed.add_item(menu_item("a", "6.5", Some("r1")), 1).await?;
        removed.add_item(menu_item("b", "3.0", Some("r1")), 1).await?;
        removed.remove_item("a").await;

        let mut zeroed = CartStore::new(storage);
        zeroed.add_item(menu_item("a", "6.5", Some("r1")), 1).await?;
        zeroed.add_item(menu_item("b", "3.0", Some("r1")), 1).await?;
        zeroed.update_quantity("a", 0).await;

        assert_eq!(removed.items(), zeroed.items());
        assert_eq!(zeroed.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_of_absent_item_is_a_noop() -> TestResult {
        let mut cart = CartStore::new(quiet_storage());

        cart.add_item(menu_item("a", "6.5", Some("r1")), 1).await?;
        cart.update_quantity("ghost", 4).await;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().map(|entry| entry.quantity), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn remove_absent_item_is_a_noop() -> TestResult {
        let mut cart = CartStore::new(quiet_storage());

        cart.add_item(menu_item("a", "6.5", Some("r1")), 1).await?;
        cart.remove_item("ghost").await;

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn total_tracks_mutation_sequences() -> TestResult {
        let mut cart = CartStore::new(quiet_storage());

        cart.add_item(menu_item("a", "6.5", Some("r1")), 2).await?;
        cart.add_item(menu_item("b", "1,200", Some("r1")), 1).await?;
        cart.update_quantity("a", 3).await;
        cart.remove_item("b").await;

        let expected: Decimal = cart
            .items()
            .iter()
            .map(|entry| entry.price.times(entry.quantity))
            .sum();

        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), Decimal::from_str_exact("19.5")?);

        Ok(())
    }

    #[tokio::test]
    async fn persist_then_rehydrate_round_trips() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).await?);

        let mut cart = CartStore::new(Arc::clone(&storage));
        cart.add_item(menu_item("a", "6.5", Some("r1")), 2).await?;
        cart.add_item(menu_item("b", "₦1,500.00", Some("r1")), 1).await?;

        let rehydrated = CartStore::rehydrate(storage).await;

        assert_eq!(rehydrated.items(), cart.items());
        assert_eq!(rehydrated.total(), cart.total());

        Ok(())
    }

    #[tokio::test]
    async fn rehydrate_with_corrupt_snapshot_starts_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).await?);

        storage.set(CART_SNAPSHOT_KEY, "not json").await?;

        let cart = CartStore::rehydrate(storage).await;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn persistence_failure_keeps_in_memory_state() -> TestResult {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_set()
            .returning(|_, _| Err(StorageError::Io(std::io::Error::other("disk full"))));

        let mut cart = CartStore::new(Arc::new(storage));

        cart.add_item(menu_item("a", "6.5", Some("r1")), 2).await?;

        assert_eq!(cart.len(), 1, "mutation must not roll back");
        assert_eq!(cart.total(), Decimal::from(13));

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_cart_and_snapshot() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).await?);

        let mut cart = CartStore::new(Arc::clone(&storage));
        cart.add_item(menu_item("a", "6.5", Some("r1")), 2).await?;
        cart.clear().await;

        assert!(cart.is_empty());
        assert_eq!(storage.get(CART_SNAPSHOT_KEY).await?, Some("[]".to_string()));

        Ok(())
    }
}

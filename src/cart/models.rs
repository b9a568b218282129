//! Cart line-item models.

use serde::{Deserialize, Serialize};

use crate::prices::Price;

/// One cart entry, keyed by menu item id. Snapshot-serialized as the
/// backend's camelCase JSON so old snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Menu item this line refers to.
    pub menu_item_id: String,
    /// Display title at the time of adding.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Ordered quantity, always at least 1.
    pub quantity: u32,
    /// Free-text note for this line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Restaurant the menu item belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
}

/// A menu item selected for the cart, before a quantity is attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewCartItem {
    /// Menu item to add.
    pub menu_item_id: String,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Thumbnail URL.
    pub img: Option<String>,
    /// Free-text note for this line.
    pub notes: Option<String>,
    /// Restaurant the menu item belongs to.
    pub restaurant_id: Option<String>,
}

impl NewCartItem {
    pub(crate) fn into_item(self, quantity: u32) -> CartItem {
        CartItem {
            menu_item_id: self.menu_item_id,
            title: self.title,
            price: self.price,
            img: self.img,
            quantity,
            notes: self.notes,
            restaurant_id: self.restaurant_id,
        }
    }
}

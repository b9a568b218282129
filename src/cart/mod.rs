//! Cart

mod models;
mod store;

pub use models::{CartItem, NewCartItem};
pub use store::{CartError, CartStore};

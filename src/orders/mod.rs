//! Orders

pub mod models;
mod poller;
mod service;

pub use models::{
    Address, CreateOrderRequest, MarkPaidRequest, Order, OrderItem, OrderItemRequest, OrderStatus,
    PaymentMethod, PaymentStatus,
};
pub use poller::{OrderPoller, PollHandle};
pub use service::*;

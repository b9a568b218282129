//! Order wire models.
//!
//! Orders are server-owned; the client holds a read-only projection
//! refreshed by polling. Field names follow the backend's camelCase JSON.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::prices::Price;

/// Lifecycle of an order as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed but not yet acknowledged by the restaurant.
    #[default]
    Pending,
    /// Accepted by the restaurant.
    Confirmed,
    /// Being prepared.
    Preparing,
    /// Out for delivery.
    OnTheWay,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled by either side.
    Cancelled,
    /// A status this client version does not know.
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Whether the order can no longer change state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OnTheWay => "on_the_way",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other => "unknown",
        };

        f.write_str(label)
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not paid yet.
    #[default]
    Unpaid,
    /// Payment confirmed.
    Paid,
    /// Payment attempted and declined.
    Failed,
    /// A state this client version does not know.
    #[serde(other)]
    Other,
}

impl PaymentStatus {
    /// Whether the order has been paid for.
    #[must_use]
    pub fn is_paid(self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Other => "unknown",
        };

        f.write_str(label)
    }
}

/// How an order is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment collected in-app.
    #[default]
    Card,
    /// Cash on delivery.
    Cash,
    /// Wallet balance.
    Wallet,
}

/// Delivery address, denormalized onto every order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// First address line.
    pub line1: String,
    /// Second address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// State or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Country.
    pub country: String,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Recipient name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One line of an order, as echoed back by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu item name at order time.
    #[serde(default)]
    pub name: String,
    /// Ordered quantity.
    #[serde(default)]
    pub quantity: u32,
    /// Unit price at order time.
    #[serde(default)]
    pub price: Price,
    /// Line subtotal.
    #[serde(default)]
    pub subtotal: Price,
}

/// Read-only projection of a server-side order.
///
/// The backend has not been uniform about which field carries the order's
/// identifier across revisions, so all three candidates are kept and
/// [`Order::order_ref`] resolves one canonically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Primary identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Document identifier used by some backend revisions.
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<String>,
    /// Human-facing order number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    /// Current lifecycle status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Current payment state.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Ordered lines.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Order total.
    #[serde(default)]
    pub total_amount: Price,
    /// Delivery address.
    #[serde(default)]
    pub address: Option<Address>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Order {
    /// The identifier to key navigation and follow-up fetches by:
    /// `id`, then `_id`, then `orderNumber`.
    #[must_use]
    pub fn order_ref(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.alt_id.as_deref())
            .or(self.order_number.as_deref())
    }
}

/// One line of an order-creation request; price and title deliberately
/// stripped, the backend re-prices from its own menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Menu item being ordered.
    pub menu_item_id: String,
    /// Quantity ordered.
    pub quantity: u32,
}

/// Order-creation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Restaurant all items belong to.
    pub restaurant_id: String,
    /// Item id/quantity pairs.
    pub items: Vec<OrderItemRequest>,
    /// Delivery address.
    pub address: Address,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Free-text note to the restaurant.
    pub notes: String,
}

/// Mark-paid request body; both fields optional, the backend defaults to
/// a paid card payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    /// Payment outcome to record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// Method the payment was made with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_ref_prefers_id_then_alt_id_then_number() {
        let mut order = Order {
            id: Some("o-1".to_string()),
            alt_id: Some("652f".to_string()),
            order_number: Some("ORD-42".to_string()),
            ..Order::default()
        };

        assert_eq!(order.order_ref(), Some("o-1"));

        order.id = None;
        assert_eq!(order.order_ref(), Some("652f"));

        order.alt_id = None;
        assert_eq!(order.order_ref(), Some("ORD-42"));

        order.order_number = None;
        assert_eq!(order.order_ref(), None);
    }

    #[test]
    fn deserializes_backend_projection() -> TestResult {
        let raw = r#"{
            "_id": "652f9f1c8e",
            "orderNumber": "ORD-1024",
            "status": "on_the_way",
            "paymentStatus": "paid",
            "items": [
                {"name": "Jollof Rice", "quantity": 2, "price": "₦1,500.00", "subtotal": 3000}
            ],
            "totalAmount": 3000,
            "createdAt": "2026-08-01T12:30:00Z"
        }"#;

        let order: Order = serde_json::from_str(raw)?;

        assert_eq!(order.order_ref(), Some("652f9f1c8e"));
        assert_eq!(order.status, OrderStatus::OnTheWay);
        assert!(order.payment_status.is_paid());
        assert_eq!(order.items.len(), 1);
        assert_eq!(
            order.items.first().map(|item| item.price),
            Some(crate::prices::Price::parse("1500.00")?)
        );

        Ok(())
    }

    #[test]
    fn unknown_status_maps_to_other() -> TestResult {
        let order: Order = serde_json::from_str(r#"{"status": "teleporting"}"#)?;

        assert_eq!(order.status, OrderStatus::Other);
        assert!(!order.status.is_terminal());

        Ok(())
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::OnTheWay.is_terminal());
    }

    #[test]
    fn create_request_serializes_to_backend_shape() -> TestResult {
        let request = CreateOrderRequest {
            restaurant_id: "r1".to_string(),
            items: vec![OrderItemRequest {
                menu_item_id: "m1".to_string(),
                quantity: 2,
            }],
            address: Address {
                line1: "12 Allen Ave".to_string(),
                city: "Lagos".to_string(),
                country: "Nigeria".to_string(),
                phone: Some("+2348000000".to_string()),
                ..Address::default()
            },
            payment_method: PaymentMethod::Card,
            notes: String::new(),
        };

        let value = serde_json::to_value(&request)?;

        assert_eq!(value.pointer("/restaurantId"), Some(&json!("r1")));
        assert_eq!(value.pointer("/items/0/menuItemId"), Some(&json!("m1")));
        assert_eq!(value.pointer("/items/0/quantity"), Some(&json!(2)));
        assert_eq!(value.pointer("/paymentMethod"), Some(&json!("card")));
        assert_eq!(value.pointer("/items/0/price"), None);
        assert_eq!(value.pointer("/address/line2"), None);

        Ok(())
    }
}

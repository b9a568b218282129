//! Orders service seam over the REST client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::api::{ApiClient, ApiError};

use super::models::{CreateOrderRequest, MarkPaidRequest, Order};

/// Order operations the backend exposes to this client.
#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Submit a new order built from the cart.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the backend
    /// rejects the order.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError>;

    /// Fetch the current projection of one order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the order is
    /// unknown.
    async fn get_order(&self, order_id: &str) -> Result<Order, ApiError>;

    /// Record a payment against an order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the backend
    /// rejects the payment.
    async fn mark_paid(&self, order_id: &str, request: MarkPaidRequest) -> Result<Order, ApiError>;

    /// List the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails.
    async fn list_my_orders(&self) -> Result<Vec<Order>, ApiError>;
}

#[async_trait]
impl OrdersApi for ApiClient {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError> {
        self.send_json(Method::POST, "orders", &request).await
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, ApiError> {
        self.get_json(&format!("orders/{order_id}")).await
    }

    async fn mark_paid(&self, order_id: &str, request: MarkPaidRequest) -> Result<Order, ApiError> {
        self.send_json(Method::PATCH, &format!("orders/{order_id}/pay"), &request)
            .await
    }

    async fn list_my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_json("orders").await
    }
}

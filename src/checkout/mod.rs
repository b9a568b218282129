//! Checkout flow.
//!
//! Turns a valid cart plus address and session into a server-side order.
//! Preconditions are checked in a fixed order with no side effects until
//! all pass; the cart is cleared only after the backend confirms the
//! order, so a failed submission can simply be retried.

mod errors;

pub use errors::CheckoutError;

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::TokenStore;
use crate::cart::CartStore;
use crate::orders::{Address, CreateOrderRequest, Order, OrderItemRequest, OrdersApi, PaymentMethod};

/// Submission state; a second submit while one is in flight is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// Ready to submit.
    #[default]
    Idle,
    /// A create-order request is in flight.
    Submitting,
    /// The last submission failed; retry is allowed.
    Failed,
}

/// Converts a cart into a submitted order.
pub struct CheckoutFlow {
    orders: Arc<dyn OrdersApi>,
    tokens: TokenStore,
    state: CheckoutState,
}

impl CheckoutFlow {
    /// Create a flow over the given order service and session.
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersApi>, tokens: TokenStore) -> Self {
        Self {
            orders,
            tokens,
            state: CheckoutState::Idle,
        }
    }

    /// Current submission state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Validate and submit the cart as an order.
    ///
    /// On success the cart is cleared and the confirmed order returned; on
    /// any failure the cart is untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] naming the first failed precondition,
    /// or the API error when the submission itself fails.
    pub async fn submit(
        &mut self,
        cart: &mut CartStore,
        address: &Address,
    ) -> Result<Order, CheckoutError> {
        if self.state == CheckoutState::Submitting {
            return Err(CheckoutError::InFlight);
        }

        let request = self.build_request(cart, address).await?;

        self.state = CheckoutState::Submitting;

        match self.orders.create_order(request).await {
            Ok(order) => {
                cart.clear().await;
                self.state = CheckoutState::Idle;

                info!(order_ref = order.order_ref(), "order placed");

                Ok(order)
            }
            Err(error) => {
                self.state = CheckoutState::Failed;

                warn!(%error, "checkout failed");

                Err(error.into())
            }
        }
    }

    /// Run the precondition chain and assemble the request body.
    async fn build_request(
        &self,
        cart: &CartStore,
        address: &Address,
    ) -> Result<CreateOrderRequest, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let phone = address.phone.as_deref().unwrap_or("");
        if address.line1.trim().is_empty()
            || address.city.trim().is_empty()
            || phone.trim().is_empty()
        {
            return Err(CheckoutError::IncompleteAddress);
        }

        let authenticated = match self.tokens.load().await {
            Ok(token) => token.is_some(),
            Err(error) => {
                warn!(%error, "failed to read session token");
                false
            }
        };
        if !authenticated {
            return Err(CheckoutError::NotSignedIn);
        }

        for item in cart.items() {
            let has_ids = !item.menu_item_id.trim().is_empty()
                && item
                    .restaurant_id
                    .as_deref()
                    .is_some_and(|id| !id.trim().is_empty());

            if !has_ids {
                return Err(CheckoutError::MissingItemIds {
                    title: item.title.clone(),
                });
            }
        }

        // The store enforces this at insert time; re-checked here because
        // the snapshot is rehydrated from storage verbatim.
        let Some(restaurant_id) = cart.restaurant_id() else {
            return Err(CheckoutError::MixedRestaurants);
        };
        if cart
            .items()
            .iter()
            .any(|item| item.restaurant_id.as_deref() != Some(restaurant_id))
        {
            return Err(CheckoutError::MixedRestaurants);
        }

        Ok(CreateOrderRequest {
            restaurant_id: restaurant_id.to_string(),
            items: cart
                .items()
                .iter()
                .map(|item| OrderItemRequest {
                    menu_item_id: item.menu_item_id.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            address: address.clone(),
            payment_method: PaymentMethod::Card,
            notes: String::new(),
        })
    }
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

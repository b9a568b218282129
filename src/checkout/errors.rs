//! Checkout errors.

use thiserror::Error;

use crate::api::ApiError;

/// Validation and submission failures, one variant per user-facing case.
///
/// Validation errors are produced before any request is sent and are fully
/// recoverable by user correction. [`CheckoutError::NotSignedIn`] is the
/// caller's cue to redirect to sign-in instead of retrying.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart holds no items.
    #[error("cart is empty")]
    EmptyCart,

    /// Address line 1, city, or phone is missing.
    #[error("please fill address and phone")]
    IncompleteAddress,

    /// No session token is stored.
    #[error("not signed in")]
    NotSignedIn,

    /// A cart line is missing its menu item or restaurant id.
    #[error("cart item {title:?} is missing its menu or restaurant id")]
    MissingItemIds {
        /// Display title of the offending line.
        title: String,
    },

    /// Cart lines name more than one restaurant.
    #[error("cart holds items from more than one restaurant")]
    MixedRestaurants,

    /// A submission is already in flight.
    #[error("an order is already being submitted")]
    InFlight,

    /// The order-creation call failed; the cart is left untouched.
    #[error(transparent)]
    Api(#[from] ApiError),
}

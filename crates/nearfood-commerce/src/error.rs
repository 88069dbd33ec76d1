//! Commerce error types.

use nearfood_store::StoreError;
use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
///
/// Message text for the validation variants is what the API surfaces
/// verbatim to clients, so it stays user-readable.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Checkout attempted with no cart or no cart items.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line references a menu item that no longer exists or has no
    /// usable price.
    #[error("Invalid cart data: missing item information")]
    MissingItemInfo,

    /// Quantity outside 1..=99.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Accumulated quantity would exceed the per-item cap.
    #[error("Maximum quantity exceeded")]
    QuantityExceedsLimit {
        requested: i64,
        max: i64,
    },

    /// Cart items span more than one restaurant.
    #[error("Cart contains items from multiple restaurants")]
    RestaurantMismatch,

    /// Other malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arithmetic overflow in money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Failure talking to the hosted store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CommerceError {
    /// Whether this is a caller mistake (400-class) rather than a
    /// data-access failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::EmptyCart
                | CommerceError::MissingItemInfo
                | CommerceError::InvalidQuantity(_)
                | CommerceError::QuantityExceedsLimit { .. }
                | CommerceError::RestaurantMismatch
                | CommerceError::Validation(_)
        )
    }
}

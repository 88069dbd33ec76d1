//! Food-delivery domain types and logic for NearFood.
//!
//! This crate carries everything between the HTTP layer and the hosted
//! store:
//!
//! - **Catalog**: restaurants, menu categories, menu items
//! - **Cart**: single-restaurant carts with quantity accumulation
//! - **Checkout**: pricing, order creation and its compensating rollback
//!
//! The checkout sequence is the one piece of real orchestration in the
//! system: resolve the cart, validate it, price it, write the order and
//! its line-item snapshots, then clear the cart best-effort.

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    pub use crate::catalog::{MenuCategory, MenuItem, Restaurant};

    pub use crate::cart::{
        Cart, CartItem, CartService, ResolvedCart, ResolvedLine, MAX_QUANTITY_PER_ITEM,
    };

    pub use crate::checkout::{
        AddressDraft, AddressService, DeliveryDetails, Order, OrderItem, OrderPricing,
        OrderStatus, UserAddress, DELIVERY_FEE_CENTS, TAX_RATE_PERCENT,
    };
}

//! Shopping cart module.
//!
//! One cart per user, pinned to a single restaurant. Mutations go through
//! [`CartService`]; checkout reads through [`resolve_cart`].

#[allow(clippy::module_inception)]
mod cart;
mod resolver;
mod service;

pub use cart::{Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use resolver::{resolve_cart, ResolvedCart, ResolvedLine};
pub use service::CartService;

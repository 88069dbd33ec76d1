//! Catalog module: restaurants and their menus.
//!
//! Externally managed data; the storefront reads it and only the seeding
//! endpoint ever writes it.

mod menu;
mod restaurant;

pub use menu::{MenuCategory, MenuItem};
pub use restaurant::Restaurant;

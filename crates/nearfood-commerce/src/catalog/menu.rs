//! Menu categories and items.

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, MenuItemId, RestaurantId};
use crate::money::Money;

/// A named section of a restaurant's menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuCategory {
    pub id: CategoryId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub display_order: u32,
}

impl MenuCategory {
    pub const TABLE: &'static str = "menu_categories";
}

/// A purchasable dish. Belongs to exactly one restaurant; `price` must be
/// positive for the item to be orderable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price in cents.
    pub price: Money,
    pub is_available: bool,
    #[serde(default)]
    pub is_veg: bool,
}

impl MenuItem {
    pub const TABLE: &'static str = "menu_items";

    /// Whether the item carries the data checkout needs to snapshot it.
    pub fn is_orderable(&self) -> bool {
        self.price.is_positive() && !self.name.is_empty()
    }
}

//! Cart and cart line rows.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{CartId, CartItemId, MenuItemId, RestaurantId, UserId};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// A user's in-progress cart. `restaurant_id` is set once the first item
/// lands and cleared again after checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
    pub created_at: i64,
}

impl Cart {
    pub const TABLE: &'static str = "carts";

    pub fn new(user_id: UserId, restaurant_id: RestaurantId) -> Self {
        Self {
            id: CartId::generate(),
            user_id,
            restaurant_id: Some(restaurant_id),
            created_at: current_timestamp(),
        }
    }
}

/// One line of a cart. Unique per (cart, menu item); repeat additions
/// accumulate quantity instead of adding rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub menu_item_id: MenuItemId,
    pub quantity: i64,
    pub created_at: i64,
}

impl CartItem {
    pub const TABLE: &'static str = "cart_items";

    pub fn new(cart_id: CartId, menu_item_id: MenuItemId, quantity: i64) -> Result<Self, CommerceError> {
        validate_quantity(quantity)?;
        Ok(Self {
            id: CartItemId::generate(),
            cart_id,
            menu_item_id,
            quantity,
            created_at: current_timestamp(),
        })
    }
}

/// Reject quantities outside 1..=[`MAX_QUANTITY_PER_ITEM`].
pub(crate) fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit {
            requested: quantity,
            max: MAX_QUANTITY_PER_ITEM,
        });
    }
    Ok(())
}

pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

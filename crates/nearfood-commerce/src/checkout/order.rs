//! Order rows and their line-item snapshots.

use serde::{Deserialize, Serialize};

use crate::catalog::MenuItem;
use crate::ids::{MenuItemId, OrderId, OrderItemId, RestaurantId, UserId};
use crate::money::Money;

/// Delivery lifecycle of an order. Only the initial `Placed` state is set
/// by this app; later transitions are driven externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Placed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Where and to whom an order ships.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryDetails {
    pub delivery_address: String,
    pub delivery_phone: String,
    pub delivery_name: String,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub status: OrderStatus,
    /// Grand total in cents (subtotal + delivery fee + tax).
    pub total_amount: Money,
    pub delivery_address: String,
    pub delivery_phone: String,
    pub delivery_name: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    pub created_at: i64,
}

impl Order {
    pub const TABLE: &'static str = "orders";

    /// A freshly placed order.
    pub fn placed(
        user_id: UserId,
        restaurant_id: RestaurantId,
        total_amount: Money,
        delivery: &DeliveryDetails,
    ) -> Self {
        Self {
            id: OrderId::generate(),
            user_id,
            restaurant_id,
            status: OrderStatus::Placed,
            total_amount,
            delivery_address: delivery.delivery_address.clone(),
            delivery_phone: delivery.delivery_phone.clone(),
            delivery_name: delivery.delivery_name.clone(),
            payment_id: None,
            payment_status: None,
            created_at: current_timestamp(),
        }
    }

    pub fn with_payment(mut self, payment_id: impl Into<String>, status: impl Into<String>) -> Self {
        self.payment_id = Some(payment_id.into());
        self.payment_status = Some(status.into());
        self
    }
}

/// Denormalized snapshot of one cart line at order time. Name and price
/// are copied so later menu edits never alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
}

impl OrderItem {
    pub const TABLE: &'static str = "order_items";

    /// Snapshot a menu item into an order line.
    pub fn snapshot(order_id: OrderId, menu_item: &MenuItem, quantity: i64) -> Self {
        Self {
            id: OrderItemId::generate(),
            order_id,
            menu_item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            price: menu_item.price,
            quantity,
        }
    }
}

pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

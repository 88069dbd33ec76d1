//! Order writer: the write side of checkout, with its compensating
//! rollback.

use nearfood_store::{Filter, Store};
use serde_json::json;

use crate::cart::ResolvedCart;
use crate::checkout::order::{DeliveryDetails, Order, OrderItem};
use crate::checkout::pricing::quote;
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};

/// Turn a resolved, non-empty cart into a durable order.
///
/// Sequence: validate every line, price, insert the order, insert the
/// line-item snapshots, then clear the cart. If line-item insertion fails
/// the freshly created order is deleted best-effort before the error
/// propagates. Cart clearing after a successful write is also
/// best-effort: the order is already durable, so a failure there is
/// logged and swallowed.
///
/// On `Ok`, an order and its items exist in the store.
pub async fn place_order(
    store: &Store,
    user_id: &UserId,
    resolved: &ResolvedCart,
    delivery: &DeliveryDetails,
) -> Result<OrderId, CommerceError> {
    if resolved.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    // Validate up front so nothing is written for a doomed cart.
    let mut priced_lines = Vec::with_capacity(resolved.lines.len());
    for line in &resolved.lines {
        let Some(menu) = line.menu_item.as_ref().filter(|m| m.is_orderable()) else {
            tracing::warn!(menu_item = %line.item.menu_item_id, "cart line missing menu item data");
            return Err(CommerceError::MissingItemInfo);
        };
        priced_lines.push((menu, line.item.quantity));
    }

    let restaurant_id = resolved
        .cart
        .restaurant_id
        .clone()
        .ok_or(CommerceError::MissingItemInfo)?;

    let pricing = quote(priced_lines.iter().map(|(m, q)| (m.price, *q)))?;

    let order = Order::placed(user_id.clone(), restaurant_id, pricing.total, delivery);
    let order: Order = store.insert_as(Order::TABLE, &order).await?;

    for (menu, quantity) in &priced_lines {
        let item = OrderItem::snapshot(order.id.clone(), menu, *quantity);
        if let Err(e) = store.insert_value(OrderItem::TABLE, &item).await {
            tracing::error!(order_id = %order.id, error = %e, "order item insert failed, rolling back order");
            rollback_order(store, &order.id).await;
            return Err(CommerceError::Store(e));
        }
    }

    clear_cart_best_effort(store, resolved).await;

    Ok(order.id)
}

/// Compensating delete for a half-written order. Its own failure is only
/// logged; there is nothing further to do inside a non-transactional
/// table API.
async fn rollback_order(store: &Store, order_id: &OrderId) {
    if let Err(e) = store
        .delete(OrderItem::TABLE, &[Filter::eq("order_id", order_id.as_str())])
        .await
    {
        tracing::error!(order_id = %order_id, error = %e, "rollback: order item delete failed");
    }
    if let Err(e) = store
        .delete(Order::TABLE, &[Filter::eq("id", order_id.as_str())])
        .await
    {
        tracing::error!(order_id = %order_id, error = %e, "rollback: order delete failed, orphan order remains");
    }
}

async fn clear_cart_best_effort(store: &Store, resolved: &ResolvedCart) {
    use crate::cart::{Cart, CartItem};

    let cart_id = resolved.cart.id.as_str();
    if let Err(e) = store
        .delete(CartItem::TABLE, &[Filter::eq("cart_id", cart_id)])
        .await
    {
        tracing::warn!(cart_id, error = %e, "cart item delete after checkout failed");
    }
    if let Err(e) = store
        .update(
            Cart::TABLE,
            &[Filter::eq("id", cart_id)],
            &json!({ "restaurant_id": null }),
        )
        .await
    {
        tracing::warn!(cart_id, error = %e, "cart reset after checkout failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{resolve_cart, Cart, CartItem, CartService};
    use crate::checkout::order::OrderStatus;
    use crate::catalog::MenuItem;
    use crate::ids::{MenuItemId, RestaurantId};
    use crate::money::Money;
    use async_trait::async_trait;
    use nearfood_store::{MemoryStore, Row, Select, StoreError};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn delivery() -> DeliveryDetails {
        DeliveryDetails {
            delivery_address: "123 Pasta Lane, Foodville".into(),
            delivery_phone: "555-010-0100".into(),
            delivery_name: "Ada".into(),
        }
    }

    async fn seed_menu_item(store: &Store, id: &str, cents: i64) {
        let item = MenuItem {
            id: MenuItemId::new(id),
            restaurant_id: RestaurantId::new("rest_1"),
            category_id: None,
            name: format!("dish {id}"),
            description: None,
            price: Money::from_cents(cents),
            is_available: true,
            is_veg: false,
        };
        store.insert_value(MenuItem::TABLE, &item).await.unwrap();
    }

    #[tokio::test]
    async fn successful_checkout_writes_order_and_clears_cart() {
        let store = Store::in_memory();
        let user = UserId::new("user_1");
        let rest = RestaurantId::new("rest_1");
        seed_menu_item(&store, "item_a", 1000).await;
        seed_menu_item(&store, "item_b", 500).await;

        let service = CartService::new(store.clone());
        service.add_item(&user, &rest, &MenuItemId::new("item_a"), 2).await.unwrap();
        service.add_item(&user, &rest, &MenuItemId::new("item_b"), 1).await.unwrap();

        let resolved = resolve_cart(&store, &user).await.unwrap().unwrap();
        let order_id = place_order(&store, &user, &resolved, &delivery()).await.unwrap();

        let order: Order = store
            .fetch_one(&Select::from(Order::TABLE).eq("id", order_id.as_str()))
            .await
            .unwrap();
        assert_eq!(order.total_amount.cents(), 2999);
        assert_eq!(order.status, OrderStatus::Placed);

        let items: Vec<OrderItem> = store
            .fetch_all(&Select::from(OrderItem::TABLE).eq("order_id", order_id.as_str()))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        // Cart is emptied and unpinned.
        let cart: Cart = store
            .fetch_one(&Select::from(Cart::TABLE).eq("user_id", user.as_str()))
            .await
            .unwrap();
        assert_eq!(cart.restaurant_id, None);
        let remaining: Vec<CartItem> = store
            .fetch_all(&Select::from(CartItem::TABLE).eq("cart_id", cart.id.as_str()))
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    /// Memory backend that stops accepting inserts once a budget runs
    /// out. Everything else passes through, so compensating deletes
    /// still work.
    struct InsertBudget {
        inner: Arc<MemoryStore>,
        remaining: AtomicU32,
    }

    #[async_trait]
    impl nearfood_store::TableStore for InsertBudget {
        async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
            self.inner.select(query).await
        }

        async fn select_one(&self, query: &Select) -> Result<Row, StoreError> {
            self.inner.select_one(query).await
        }

        async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
            let spent = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            if spent.is_err() {
                return Err(StoreError::Connection("insert dropped".into()));
            }
            self.inner.insert(table, row).await
        }

        async fn update(
            &self,
            table: &str,
            filters: &[Filter],
            patch: Row,
        ) -> Result<Vec<Row>, StoreError> {
            self.inner.update(table, filters, patch).await
        }

        async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
            self.inner.delete(table, filters).await
        }

        async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
            self.inner.count(table, filters).await
        }
    }

    #[tokio::test]
    async fn item_insert_failure_rolls_back_the_order() {
        let memory = Arc::new(MemoryStore::new());
        let store = Store::new(memory.clone(), memory.clone());
        let user = UserId::new("user_1");
        let rest = RestaurantId::new("rest_1");
        seed_menu_item(&store, "item_a", 1000).await;
        seed_menu_item(&store, "item_b", 500).await;

        let service = CartService::new(store.clone());
        service.add_item(&user, &rest, &MenuItemId::new("item_a"), 2).await.unwrap();
        service.add_item(&user, &rest, &MenuItemId::new("item_b"), 1).await.unwrap();
        let resolved = resolve_cart(&store, &user).await.unwrap().unwrap();

        // One insert left: the order lands, the first line item does not.
        let flaky = Store::new(
            Arc::new(InsertBudget {
                inner: memory.clone(),
                remaining: AtomicU32::new(1),
            }),
            memory,
        );
        let err = place_order(&flaky, &user, &resolved, &delivery()).await.unwrap_err();
        assert!(matches!(err, CommerceError::Store(StoreError::Connection(_))));

        // The compensating delete removed the half-written order.
        assert_eq!(store.count(Order::TABLE, &[]).await.unwrap(), 0);
        assert_eq!(store.count(OrderItem::TABLE, &[]).await.unwrap(), 0);
        // The cart was never cleared.
        assert_eq!(store.count(CartItem::TABLE, &[]).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let store = Store::in_memory();
        let user = UserId::new("user_1");
        let resolved = ResolvedCart {
            cart: Cart::new(user.clone(), RestaurantId::new("rest_1")),
            lines: Vec::new(),
        };
        let err = place_order(&store, &user, &resolved, &delivery()).await.unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
        assert_eq!(store.count(Order::TABLE, &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_menu_item_fails_before_any_write() {
        let store = Store::in_memory();
        let user = UserId::new("user_1");
        let rest = RestaurantId::new("rest_1");
        seed_menu_item(&store, "item_a", 1000).await;

        let service = CartService::new(store.clone());
        service.add_item(&user, &rest, &MenuItemId::new("item_a"), 1).await.unwrap();
        // Line pointing at a menu item that was deleted since.
        service.add_item(&user, &rest, &MenuItemId::new("item_gone"), 1).await.unwrap();

        let resolved = resolve_cart(&store, &user).await.unwrap().unwrap();
        let err = place_order(&store, &user, &resolved, &delivery()).await.unwrap_err();
        assert!(matches!(err, CommerceError::MissingItemInfo));

        // Validation ran before any row was written.
        assert_eq!(store.count(Order::TABLE, &[]).await.unwrap(), 0);
        assert_eq!(store.count(OrderItem::TABLE, &[]).await.unwrap(), 0);
        // And the cart survives untouched.
        assert_eq!(store.count(CartItem::TABLE, &[]).await.unwrap(), 2);
    }
}

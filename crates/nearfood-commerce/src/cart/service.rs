//! Cart mutations against the hosted store.

use nearfood_store::{Filter, Select, Store};
use serde_json::json;

use crate::cart::cart::{validate_quantity, Cart, CartItem, MAX_QUANTITY_PER_ITEM};
use crate::error::CommerceError;
use crate::ids::{MenuItemId, RestaurantId, UserId};

/// Cart mutation service.
///
/// Two-step protocol per the storefront's rules: fetch-or-create the
/// user's cart, reset it when the restaurant changes, then insert or
/// accumulate the line.
#[derive(Clone)]
pub struct CartService {
    store: Store,
}

impl CartService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Add `quantity` of a menu item to the user's cart.
    ///
    /// Switching restaurants clears existing lines first. Accumulation
    /// past [`MAX_QUANTITY_PER_ITEM`] fails and leaves the existing line
    /// untouched.
    pub async fn add_item(
        &self,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
        menu_item_id: &MenuItemId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;

        let cart = self.fetch_or_create(user_id, restaurant_id).await?;

        let existing: Option<CartItem> = self
            .store
            .fetch_optional(
                &Select::from(CartItem::TABLE)
                    .eq("cart_id", cart.id.as_str())
                    .eq("menu_item_id", menu_item_id.as_str()),
            )
            .await?;

        match existing {
            Some(line) => {
                let new_quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CommerceError::Overflow)?;
                if new_quantity > MAX_QUANTITY_PER_ITEM {
                    return Err(CommerceError::QuantityExceedsLimit {
                        requested: new_quantity,
                        max: MAX_QUANTITY_PER_ITEM,
                    });
                }
                self.store
                    .update(
                        CartItem::TABLE,
                        &[Filter::eq("id", line.id.as_str())],
                        &json!({ "quantity": new_quantity }),
                    )
                    .await?;
            }
            None => {
                let line = CartItem::new(cart.id.clone(), menu_item_id.clone(), quantity)?;
                self.store.insert_value(CartItem::TABLE, &line).await?;
            }
        }

        Ok(())
    }

    /// Delete all lines of the user's cart. No-op when there is no cart.
    pub async fn clear(&self, user_id: &UserId) -> Result<(), CommerceError> {
        let cart: Option<Cart> = self
            .store
            .fetch_optional(&Select::from(Cart::TABLE).eq("user_id", user_id.as_str()))
            .await?;
        if let Some(cart) = cart {
            self.store
                .delete(CartItem::TABLE, &[Filter::eq("cart_id", cart.id.as_str())])
                .await?;
        }
        Ok(())
    }

    /// Fetch the user's cart, creating it if absent and re-pinning it when
    /// the restaurant differs (which discards the old lines).
    async fn fetch_or_create(
        &self,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
    ) -> Result<Cart, CommerceError> {
        let cart: Option<Cart> = self
            .store
            .fetch_optional(&Select::from(Cart::TABLE).eq("user_id", user_id.as_str()))
            .await?;

        let Some(mut cart) = cart else {
            let cart = Cart::new(user_id.clone(), restaurant_id.clone());
            return Ok(self.store.insert_as(Cart::TABLE, &cart).await?);
        };

        if cart.restaurant_id.as_ref() != Some(restaurant_id) {
            // Restaurant switch: old lines must go before the new one lands.
            self.store
                .delete(CartItem::TABLE, &[Filter::eq("cart_id", cart.id.as_str())])
                .await?;
            self.store
                .update(
                    Cart::TABLE,
                    &[Filter::eq("id", cart.id.as_str())],
                    &json!({ "restaurant_id": restaurant_id.as_str() }),
                )
                .await?;
            cart.restaurant_id = Some(restaurant_id.clone());
        }

        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cart_items(store: &Store, user: &UserId) -> Vec<CartItem> {
        let cart: Cart = store
            .fetch_one(&Select::from(Cart::TABLE).eq("user_id", user.as_str()))
            .await
            .unwrap();
        store
            .fetch_all(&Select::from(CartItem::TABLE).eq("cart_id", cart.id.as_str()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn repeat_additions_accumulate_on_one_row() {
        let store = Store::in_memory();
        let service = CartService::new(store.clone());
        let user = UserId::new("user_1");
        let rest = RestaurantId::new("rest_1");
        let item = MenuItemId::new("item_1");

        service.add_item(&user, &rest, &item, 2).await.unwrap();
        service.add_item(&user, &rest, &item, 3).await.unwrap();

        let items = cart_items(&store, &user).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[tokio::test]
    async fn capacity_overflow_is_rejected_and_leaves_quantity_unchanged() {
        let store = Store::in_memory();
        let service = CartService::new(store.clone());
        let user = UserId::new("user_1");
        let rest = RestaurantId::new("rest_1");
        let item = MenuItemId::new("item_1");

        service.add_item(&user, &rest, &item, 98).await.unwrap();
        let err = service.add_item(&user, &rest, &item, 5).await.unwrap_err();
        assert!(matches!(
            err,
            CommerceError::QuantityExceedsLimit { requested: 103, .. }
        ));

        let items = cart_items(&store, &user).await;
        assert_eq!(items[0].quantity, 98);
    }

    #[tokio::test]
    async fn restaurant_switch_clears_existing_lines() {
        let store = Store::in_memory();
        let service = CartService::new(store.clone());
        let user = UserId::new("user_1");

        service
            .add_item(&user, &RestaurantId::new("rest_a"), &MenuItemId::new("item_a"), 2)
            .await
            .unwrap();
        service
            .add_item(&user, &RestaurantId::new("rest_b"), &MenuItemId::new("item_b"), 1)
            .await
            .unwrap();

        let cart: Cart = store
            .fetch_one(&Select::from(Cart::TABLE).eq("user_id", user.as_str()))
            .await
            .unwrap();
        assert_eq!(cart.restaurant_id, Some(RestaurantId::new("rest_b")));

        let items = cart_items(&store, &user).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].menu_item_id, MenuItemId::new("item_b"));
    }

    #[tokio::test]
    async fn clear_removes_all_lines() {
        let store = Store::in_memory();
        let service = CartService::new(store.clone());
        let user = UserId::new("user_1");
        let rest = RestaurantId::new("rest_1");

        service.add_item(&user, &rest, &MenuItemId::new("a"), 1).await.unwrap();
        service.add_item(&user, &rest, &MenuItemId::new("b"), 2).await.unwrap();
        service.clear(&user).await.unwrap();

        assert!(cart_items(&store, &user).await.is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_is_invalid() {
        let store = Store::in_memory();
        let service = CartService::new(store);
        let err = service
            .add_item(
                &UserId::new("u"),
                &RestaurantId::new("r"),
                &MenuItemId::new("m"),
                0,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidQuantity(0)));
    }
}

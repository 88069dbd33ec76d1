//! The caller's cart.

use axum::extract::State;
use axum::Json;
use nearfood_commerce::cart::{resolve_cart, CartService, ResolvedCart};
use nearfood_commerce::catalog::MenuItem;
use nearfood_commerce::checkout::{quote, OrderPricing};
use nearfood_commerce::{MenuItemId, RestaurantId};
use nearfood_store::Select;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::extract::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct AddItemBody {
    restaurant_id: String,
    menu_item_id: String,
    #[serde(default = "default_quantity")]
    quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// `GET /api/cart`: the resolved cart, or the empty shape.
pub(crate) async fn show(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let resolved = resolve_cart(&state.store, &user.user_id()).await?;
    Ok(Json(cart_payload(resolved.as_ref())))
}

/// `POST /api/cart`: add a menu item, switching restaurants if needed.
pub(crate) async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<AddItemBody>,
) -> Result<Json<Value>, AppError> {
    let menu_item: MenuItem = state
        .store
        .fetch_one(&Select::from(MenuItem::TABLE).eq("id", body.menu_item_id.as_str()))
        .await?;
    if menu_item.restaurant_id.as_str() != body.restaurant_id {
        return Err(AppError::validation(
            "Menu item does not belong to this restaurant",
        ));
    }
    if !menu_item.is_available {
        return Err(AppError::validation("Menu item is not available"));
    }

    let user_id = user.user_id();
    CartService::new(state.store.clone())
        .add_item(
            &user_id,
            &RestaurantId::new(body.restaurant_id),
            &MenuItemId::new(body.menu_item_id),
            body.quantity,
        )
        .await?;

    let resolved = resolve_cart(&state.store, &user_id).await?;
    Ok(Json(cart_payload(resolved.as_ref())))
}

/// `DELETE /api/cart`: drop every item.
pub(crate) async fn clear(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    CartService::new(state.store.clone())
        .clear(&user.user_id())
        .await?;
    Ok(Json(json!({ "success": true })))
}

fn cart_payload(resolved: Option<&ResolvedCart>) -> Value {
    let Some(resolved) = resolved else {
        return json!({
            "cart": null,
            "items": [],
            "pricing": OrderPricing::ZERO,
        });
    };

    let items: Vec<Value> = resolved
        .lines
        .iter()
        .map(|line| {
            json!({
                "id": line.item.id,
                "menu_item_id": line.item.menu_item_id,
                "quantity": line.item.quantity,
                "name": line.menu_item.as_ref().map(|m| m.name.as_str()),
                "price": line.menu_item.as_ref().map(|m| m.price),
            })
        })
        .collect();

    // Lines whose menu item vanished are shown but not priced; checkout
    // rejects them anyway.
    let pricing = quote(
        resolved
            .lines
            .iter()
            .filter_map(|l| l.menu_item.as_ref().map(|m| (m.price, l.item.quantity))),
    )
    .unwrap_or(OrderPricing::ZERO);

    json!({
        "cart": resolved.cart,
        "items": items,
        "pricing": pricing,
    })
}

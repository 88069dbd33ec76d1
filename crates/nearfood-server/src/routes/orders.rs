//! Order placement and history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nearfood_commerce::checkout::{checkout, DeliveryDetails, Order, OrderItem, OrderStatus};
use nearfood_commerce::UserId;
use nearfood_store::{Filter, Select, Store};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::extract::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct CreateOrderBody {
    delivery_address: String,
    delivery_phone: String,
    delivery_name: String,
}

impl CreateOrderBody {
    fn into_details(self) -> Result<DeliveryDetails, AppError> {
        let address = self.delivery_address.trim().to_string();
        let phone = self.delivery_phone.trim().to_string();
        let name = self.delivery_name.trim().to_string();

        if address.chars().count() < 10 {
            return Err(AppError::validation(
                "Delivery address must be at least 10 characters",
            ));
        }
        if !valid_phone(&phone) {
            return Err(AppError::validation("Invalid phone number"));
        }
        if name.chars().count() < 2 {
            return Err(AppError::validation(
                "Delivery name must be at least 2 characters",
            ));
        }
        Ok(DeliveryDetails {
            delivery_address: address,
            delivery_phone: phone,
            delivery_name: name,
        })
    }
}

/// Digits with common separators, at least 10 digits overall.
fn valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    digits >= 10
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
}

/// `GET /api/orders`: the caller's orders, newest first, with items.
pub(crate) async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let orders: Vec<Order> = state
        .store
        .fetch_all(
            &Select::from(Order::TABLE)
                .eq("user_id", user.user_id().as_str())
                .order_desc("created_at"),
        )
        .await?;

    let mut data = Vec::with_capacity(orders.len());
    for order in &orders {
        data.push(order_payload(&state.store, order).await?);
    }
    Ok(Json(json!({ "data": data })))
}

/// `POST /api/orders`: check the current cart out.
pub(crate) async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateOrderBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let details = body.into_details()?;
    let user_id = user.user_id();
    let order_id = checkout(&state.store, &user_id, &details).await?;

    let order = fetch_owned(&state.store, &user_id, order_id.as_str()).await?;
    let payload = order_payload(&state.store, &order).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

/// `GET /api/orders/{id}`: owner-scoped; another user's order is 404.
pub(crate) async fn show(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let order = fetch_owned(&state.store, &user.user_id(), &order_id).await?;
    Ok(Json(order_payload(&state.store, &order).await?))
}

const PATCHABLE_FIELDS: &[&str] = &[
    "status",
    "payment_status",
    "delivery_address",
    "delivery_phone",
    "delivery_name",
];

/// `PATCH /api/orders/{id}`: update allow-listed fields only.
pub(crate) async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let user_id = user.user_id();
    // Ownership check before any write.
    fetch_owned(&state.store, &user_id, &order_id).await?;

    let mut patch = Map::new();
    for field in PATCHABLE_FIELDS {
        if let Some(value) = body.get(*field) {
            patch.insert((*field).to_string(), value.clone());
        }
    }
    if patch.is_empty() {
        return Err(AppError::validation("No valid fields to update"));
    }
    if let Some(status) = patch.get("status") {
        if serde_json::from_value::<OrderStatus>(status.clone()).is_err() {
            return Err(AppError::validation("Invalid order status"));
        }
    }

    state
        .store
        .update(
            Order::TABLE,
            &[
                Filter::eq("id", order_id.as_str()),
                Filter::eq("user_id", user_id.as_str()),
            ],
            &patch,
        )
        .await?;

    let order = fetch_owned(&state.store, &user_id, &order_id).await?;
    Ok(Json(order_payload(&state.store, &order).await?))
}

async fn fetch_owned(store: &Store, user_id: &UserId, order_id: &str) -> Result<Order, AppError> {
    let order: Option<Order> = store
        .fetch_optional(
            &Select::from(Order::TABLE)
                .eq("id", order_id)
                .eq("user_id", user_id.as_str()),
        )
        .await?;
    order.ok_or(AppError::NotFound)
}

async fn order_payload(store: &Store, order: &Order) -> Result<Value, AppError> {
    let items: Vec<OrderItem> = store
        .fetch_all(&Select::from(OrderItem::TABLE).eq("order_id", order.id.as_str()))
        .await?;
    let mut payload = serde_json::to_value(order)
        .map_err(|e| AppError::Internal(e.into()))?;
    payload["items"] = serde_json::to_value(items).map_err(|e| AppError::Internal(e.into()))?;
    Ok(payload)
}

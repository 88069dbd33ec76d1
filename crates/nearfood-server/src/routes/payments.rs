//! Payment session creation and verification.

use axum::extract::State;
use axum::Json;
use nearfood_commerce::cart::resolve_cart;
use nearfood_commerce::checkout::{place_order, quote, DeliveryDetails, Order};
use nearfood_store::{Filter, Select};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::extract::AuthUser;
use crate::state::AppState;

/// Hard ceiling on a single payment: $100,000.
const MAX_AMOUNT_CENTS: i64 = 100_000_00;
/// Gateways round in odd ways; amounts within a dollar of the computed
/// total are accepted.
const AMOUNT_TOLERANCE_CENTS: i64 = 100;

#[derive(Deserialize)]
pub(crate) struct CreateOrderBody {
    /// Amount in cents.
    amount: i64,
}

#[derive(Deserialize)]
pub(crate) struct VerifyBody {
    session_id: String,
    cart_id: String,
    /// Amount the client believes it paid, in cents. Authoritative only
    /// in dummy mode; live mode uses the gateway's figure.
    amount: i64,
    #[serde(flatten)]
    delivery: DeliveryBody,
}

#[derive(Deserialize)]
pub(crate) struct DeliveryBody {
    delivery_address: String,
    delivery_phone: String,
    delivery_name: String,
}

/// `POST /api/payments/create-order`: open a payment session.
pub(crate) async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateOrderBody>,
) -> Result<Json<Value>, AppError> {
    if body.amount <= 0 {
        return Err(AppError::validation("Amount must be positive"));
    }
    if body.amount > MAX_AMOUNT_CENTS {
        return Err(AppError::validation("Amount exceeds the maximum"));
    }

    let session = state
        .payments
        .create_session(body.amount, &user.0.id)
        .await?;
    Ok(Json(json!({
        "session_id": session.id,
        "url": session.url,
        "amount": body.amount,
        "dummy": state.payments.is_dummy(),
    })))
}

/// `POST /api/payments/verify`: confirm a paid session and turn the
/// cart into a paid order.
pub(crate) async fn verify(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<VerifyBody>,
) -> Result<Json<Value>, AppError> {
    let verified = state.payments.verify_session(&body.session_id).await?;
    if !verified.paid {
        return Err(AppError::validation("Payment has not completed"));
    }
    // Dummy mode has no gateway-side amount; the claimed one stands in.
    let paid_amount = verified.amount_cents.unwrap_or(body.amount);

    let user_id = user.user_id();
    let resolved = resolve_cart(&state.store, &user_id)
        .await?
        .filter(|r| r.cart.id.as_str() == body.cart_id)
        .ok_or(AppError::NotFound)?;
    if resolved.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    // Every line must come from the cart's one restaurant.
    let cart_restaurant = resolved.cart.restaurant_id.as_ref();
    let single_restaurant = resolved.lines.iter().all(|line| {
        line.menu_item
            .as_ref()
            .map(|m| Some(&m.restaurant_id) == cart_restaurant)
            .unwrap_or(false)
    });
    if !single_restaurant {
        return Err(AppError::validation(
            "Cart contains items from multiple restaurants",
        ));
    }

    let pricing = quote(
        resolved
            .lines
            .iter()
            .filter_map(|l| l.menu_item.as_ref().map(|m| (m.price, l.item.quantity))),
    )
    .map_err(AppError::from)?;
    if (pricing.total.cents() - paid_amount).abs() > AMOUNT_TOLERANCE_CENTS {
        return Err(AppError::validation("Paid amount does not match the cart"));
    }

    let details = DeliveryDetails {
        delivery_address: body.delivery.delivery_address,
        delivery_phone: body.delivery.delivery_phone,
        delivery_name: body.delivery.delivery_name,
    };
    let order_id = place_order(&state.store, &user_id, &resolved, &details).await?;

    state
        .store
        .update(
            Order::TABLE,
            &[Filter::eq("id", order_id.as_str())],
            &json!({
                "payment_id": body.session_id,
                "payment_status": "paid",
            }),
        )
        .await?;

    let order: Order = state
        .store
        .fetch_one(&Select::from(Order::TABLE).eq("id", order_id.as_str()))
        .await?;
    Ok(Json(json!({
        "order_id": order.id,
        "payment_status": order.payment_status,
        "total": order.total_amount,
    })))
}

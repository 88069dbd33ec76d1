//! Checkout entry point: resolve the caller's cart and hand it to the
//! order writer.

use nearfood_store::Store;

use crate::cart::resolve_cart;
use crate::checkout::order::DeliveryDetails;
use crate::checkout::writer::place_order;
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};

/// Check out the user's current cart.
///
/// Fails with [`CommerceError::EmptyCart`] when the user has no cart or
/// the cart holds no lines. Everything else is delegated to
/// [`place_order`].
pub async fn checkout(
    store: &Store,
    user_id: &UserId,
    delivery: &DeliveryDetails,
) -> Result<OrderId, CommerceError> {
    let resolved = resolve_cart(store, user_id)
        .await?
        .ok_or(CommerceError::EmptyCart)?;
    if resolved.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    tracing::info!(
        user_id = %user_id,
        lines = resolved.lines.len(),
        "placing order"
    );
    place_order(store, user_id, &resolved, delivery).await
}

//! Cart resolver: the read side of checkout.

use nearfood_store::{Select, Store};

use crate::cart::{Cart, CartItem};
use crate::catalog::MenuItem;
use crate::error::CommerceError;
use crate::ids::UserId;

/// A cart line joined with its menu item. The menu item is `None` when it
/// has been deleted since the line was added; checkout treats that as a
/// validation failure, not a crash.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub item: CartItem,
    pub menu_item: Option<MenuItem>,
}

/// A user's cart together with its joined lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCart {
    pub cart: Cart,
    pub lines: Vec<ResolvedLine>,
}

impl ResolvedCart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.item.quantity).sum()
    }
}

/// Fetch the user's cart with its line items and their menu items.
///
/// Read-only. Returns `Ok(None)` when the user has no cart yet; that is
/// an ordinary state, not an error. Any other store failure propagates.
pub async fn resolve_cart(
    store: &Store,
    user_id: &UserId,
) -> Result<Option<ResolvedCart>, CommerceError> {
    let cart: Option<Cart> = store
        .fetch_optional(&Select::from(Cart::TABLE).eq("user_id", user_id.as_str()))
        .await?;
    let Some(cart) = cart else {
        return Ok(None);
    };

    let items: Vec<CartItem> = store
        .fetch_all(
            &Select::from(CartItem::TABLE)
                .eq("cart_id", cart.id.as_str())
                .order_asc("created_at"),
        )
        .await?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let menu_item: Option<MenuItem> = store
            .fetch_optional(&Select::from(MenuItem::TABLE).eq("id", item.menu_item_id.as_str()))
            .await?;
        lines.push(ResolvedLine { item, menu_item });
    }

    Ok(Some(ResolvedCart { cart, lines }))
}

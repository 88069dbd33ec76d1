//! Order pricing: the one pure calculation in the system.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::Money;

/// Flat delivery fee, charged whenever the subtotal is non-zero.
pub const DELIVERY_FEE_CENTS: i64 = 299;

/// Sales tax as a whole percentage of the subtotal.
pub const TAX_RATE_PERCENT: u32 = 8;

/// Complete pricing breakdown for an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPricing {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderPricing {
    pub const ZERO: OrderPricing = OrderPricing {
        subtotal: Money::ZERO,
        delivery_fee: Money::ZERO,
        tax: Money::ZERO,
        total: Money::ZERO,
    };
}

/// Price a sequence of (unit price, quantity) lines.
///
/// Subtotal is the exact cent sum; tax is 8% rounded half-up; the
/// delivery fee applies only to non-empty orders, so an empty cart prices
/// to all zeroes. Cent arithmetic means the decimal `round2` of the total
/// is already exact.
///
/// ```
/// use nearfood_commerce::checkout::quote;
/// use nearfood_commerce::Money;
///
/// let pricing = quote([(Money::from_cents(1000), 2), (Money::from_cents(500), 1)]).unwrap();
/// assert_eq!(pricing.total.cents(), 2999);
/// ```
pub fn quote(
    lines: impl IntoIterator<Item = (Money, i64)>,
) -> Result<OrderPricing, CommerceError> {
    let mut subtotal = Money::ZERO;
    for (unit_price, quantity) in lines {
        let line_total = unit_price
            .checked_mul(quantity)
            .ok_or(CommerceError::Overflow)?;
        subtotal = subtotal.checked_add(line_total).ok_or(CommerceError::Overflow)?;
    }

    if subtotal.is_zero() {
        return Ok(OrderPricing::ZERO);
    }

    let delivery_fee = Money::from_cents(DELIVERY_FEE_CENTS);
    let tax = subtotal.percent(TAX_RATE_PERCENT).ok_or(CommerceError::Overflow)?;
    let total = subtotal
        .checked_add(delivery_fee)
        .and_then(|t| t.checked_add(tax))
        .ok_or(CommerceError::Overflow)?;

    Ok(OrderPricing {
        subtotal,
        delivery_fee,
        tax,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_prices_to_zero() {
        let pricing = quote([]).unwrap();
        assert_eq!(pricing, OrderPricing::ZERO);
    }

    #[test]
    fn fee_and_tax_on_a_typical_cart() {
        // $10.00 x 2 + $5.00 x 1 => subtotal $25.00, fee $2.99, tax $2.00.
        let pricing = quote([(Money::from_cents(1000), 2), (Money::from_cents(500), 1)]).unwrap();
        assert_eq!(pricing.subtotal.cents(), 2500);
        assert_eq!(pricing.delivery_fee.cents(), 299);
        assert_eq!(pricing.tax.cents(), 200);
        assert_eq!(pricing.total.cents(), 2999);
    }

    #[test]
    fn delivery_fee_only_on_non_empty_subtotal() {
        let pricing = quote([(Money::from_cents(1), 1)]).unwrap();
        assert_eq!(pricing.delivery_fee.cents(), DELIVERY_FEE_CENTS);
        assert_eq!(pricing.tax.cents(), 0); // 8% of 1 cent rounds to 0
        assert_eq!(pricing.total.cents(), 300);
    }

    #[test]
    fn tax_rounds_half_up() {
        // 8% of $1.31 = 10.48 cents -> 10; 8% of $1.32 = 10.56 -> 11.
        assert_eq!(quote([(Money::from_cents(131), 1)]).unwrap().tax.cents(), 10);
        assert_eq!(quote([(Money::from_cents(132), 1)]).unwrap().tax.cents(), 11);
    }

    #[test]
    fn overflow_is_an_error() {
        let err = quote([(Money::from_cents(i64::MAX), 2)]).unwrap_err();
        assert!(matches!(err, CommerceError::Overflow));
    }
}

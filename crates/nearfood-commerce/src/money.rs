//! Money as integer cents.
//!
//! The storefront is single-currency (USD), so `Money` is a cents newtype
//! rather than an (amount, currency) pair; table rows store bare integers
//! and float rounding never enters pricing arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// A monetary amount in cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Build from a decimal dollar amount, rounding to the nearest cent.
    ///
    /// ```
    /// use nearfood_commerce::Money;
    /// assert_eq!(Money::from_decimal(12.99).cents(), 1299);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked multiplication by a quantity; `None` on overflow.
    pub fn checked_mul(self, factor: i64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Whole-percent share of this amount, rounded half-up to the cent.
    ///
    /// ```
    /// use nearfood_commerce::Money;
    /// assert_eq!(Money::from_cents(2500).percent(8).unwrap().cents(), 200);
    /// ```
    pub fn percent(self, pct: u32) -> Option<Money> {
        let scaled = self.0.checked_mul(pct as i64)?;
        Some(Money((scaled + 50) / 100))
    }

    /// Format as a display string, e.g. `$49.99`.
    pub fn display(self) -> String {
        format!("${:.2}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

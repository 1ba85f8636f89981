//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront amounts are US dollars, so `Price` carries no currency
//! code. Amounts are never negative: construction through [`Price::new`]
//! rejects negative values, and the arithmetic helpers cannot produce one.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned when a price would be negative.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("price cannot be negative (got {0})")]
pub struct NegativePrice(pub Decimal);

/// A non-negative monetary amount in dollars.
///
/// Serializes as a JSON number, matching the payloads the browser storefront
/// sends (`"price": 4.99`).
///
/// ```
/// use icedelights_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(499, 2)).unwrap();
/// assert_eq!(price.to_string(), "$4.99");
/// assert_eq!(price.times(3).to_string(), "$14.97");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "WirePrice", into = "WirePrice")]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`NegativePrice`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, NegativePrice> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(NegativePrice(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (line total).
    ///
    /// Panics if the product overflows `Decimal`; use [`Price::checked_times`]
    /// for amounts that did not come from the catalog.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Multiply by a quantity, or `None` on overflow.
    ///
    /// ```
    /// use icedelights_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Price::from_cents(499).checked_times(2), Some(Price::from_cents(998)));
    /// assert!(Price::new(Decimal::MAX).unwrap().checked_times(2).is_none());
    /// ```
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Add two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The amount rounded to cents, without a currency symbol (e.g. `4.99`).
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.to_plain_string())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl TryFrom<Decimal> for Price {
    type Error = NegativePrice;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Serde shim: a decimal carried as a JSON number.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct WirePrice(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl TryFrom<WirePrice> for Price {
    type Error = NegativePrice;

    fn try_from(wire: WirePrice) -> Result<Self, Self::Error> {
        Self::new(wire.0)
    }
}

impl From<Price> for WirePrice {
    fn from(price: Price) -> Self {
        Self(price.0)
    }
}

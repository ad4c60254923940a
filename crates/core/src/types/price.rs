//! Type-safe price and discount representation using decimal arithmetic.
//!
//! Prices are persisted as plain numbers (the document store has no decimal
//! type in the catalog schema), but all arithmetic happens on [`Decimal`].

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`] or [`DiscountPercent`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The discount is outside 0-100.
    #[error("discount must be between 0 and 100 percent, got {0}")]
    DiscountOutOfRange(u8),
}

/// A non-negative product price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price after applying `discount`, rounded to cents.
    ///
    /// Never exceeds the original price, so it cannot overflow.
    #[must_use]
    pub fn discounted(&self, discount: DiscountPercent) -> Self {
        let factor = Decimal::ONE_HUNDRED - Decimal::from(discount.as_u8());
        let amount = match self.0.checked_mul(factor) {
            Some(scaled) => scaled / Decimal::ONE_HUNDRED,
            None => self.0 / Decimal::ONE_HUNDRED * factor,
        };
        Self(amount.round_dp(2))
    }

    /// The price multiplied by a quantity, or `None` on overflow.
    #[must_use]
    pub fn checked_times(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// The sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Total of `prices`, or `None` if any partial sum overflows.
    #[must_use]
    pub fn checked_sum<I: IntoIterator<Item = Self>>(prices: I) -> Option<Self> {
        prices
            .into_iter()
            .try_fold(Self::ZERO, |total, price| total.checked_add(price))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// A whole-number discount percentage between 0 and 100 inclusive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// Maximum discount.
    pub const MAX: u8 = 100;

    /// Create a discount percentage.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::DiscountOutOfRange` if `percent` exceeds 100.
    pub const fn new(percent: u8) -> Result<Self, PriceError> {
        if percent > Self::MAX {
            return Err(PriceError::DiscountOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// The percentage as a number.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DiscountPercent {
    type Error = PriceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercent> for u8 {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

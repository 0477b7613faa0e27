//! Prices

use std::ops::Deref;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Prices can't be negative.
    #[error("price {0} is negative")]
    Negative(Decimal),
}

/// Represents a non-negative price in major currency units (e.g. dollars).
///
/// Stored as an exact decimal; serialized as a plain number so persisted
/// course snapshots keep their original shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price {
    value: Decimal,
}

impl Price {
    /// A price of zero.
    pub const ZERO: Price = Price {
        value: Decimal::ZERO,
    };

    /// Creates a new Price
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `value` is below zero.
    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PriceError::Negative(value));
        }

        Ok(Price { value })
    }

    /// Creates a price from a whole number of major units.
    pub fn whole(units: u32) -> Self {
        Price {
            value: Decimal::from(units),
        }
    }

    /// Convert into money of the given currency.
    pub fn to_money(self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.value, currency)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.value
    }
}

impl Deref for Price {
    type Target = Decimal;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

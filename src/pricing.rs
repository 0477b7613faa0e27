//! Pricing
//!
//! Side-effect free arithmetic over a cart and an applied discount.

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};

use crate::cart::Cart;

/// Orders below this subtotal (in major units) can't take a promo code.
pub const MINIMUM_ORDER_THRESHOLD: Decimal = Decimal::from_parts(120, 0, 0, false, 0);

/// Derived pricing for a cart. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingState {
    /// Sum of entry prices
    pub subtotal: Money<'static, Currency>,

    /// Applied promo discount, or zero
    pub discount: Money<'static, Currency>,

    /// Subtotal minus discount, floored at zero
    pub total: Money<'static, Currency>,
}

impl PricingState {
    /// Derive pricing for `cart` with an optional discount.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the discount is in a different currency to the cart.
    pub fn derive(
        cart: &Cart,
        discount: Option<Money<'static, Currency>>,
    ) -> Result<Self, MoneyError> {
        let subtotal = compute_subtotal(cart);
        let discount = discount.unwrap_or_else(|| Money::from_minor(0, cart.currency()));
        let total = compute_total(subtotal, discount)?;

        Ok(Self {
            subtotal,
            discount,
            total,
        })
    }

    /// Whether a discount is being applied.
    pub fn has_discount(&self) -> bool {
        !self.discount.is_zero()
    }
}

/// Calculates the subtotal of a cart: the sum of entry prices, zero when empty.
pub fn compute_subtotal(cart: &Cart) -> Money<'static, Currency> {
    let sum: Decimal = cart.iter().map(|entry| *entry.course().price).sum();

    Money::from_decimal(sum, cart.currency())
}

/// Calculates `subtotal - discount`, never going below zero.
///
/// # Errors
///
/// Returns a [`MoneyError`] if the two amounts have different currencies.
pub fn compute_total<'a>(
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, MoneyError> {
    let total = subtotal.sub(discount)?;

    if total.is_negative() {
        return Ok(Money::from_minor(0, subtotal.currency()));
    }

    Ok(total)
}

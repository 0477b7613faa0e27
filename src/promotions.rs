//! Promotions
//!
//! Promo codes are fixed, case-insensitive, and deduct an absolute amount from
//! orders that reach [`MINIMUM_ORDER_THRESHOLD`].

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::Cart,
    pricing::{MINIMUM_ORDER_THRESHOLD, compute_subtotal},
};

/// Reasons a promo code can't be applied, checked in this order.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PromoError {
    /// Nothing was entered.
    #[error("Please enter a promo code")]
    EmptyCode,

    /// The order is too small for any promo code.
    #[error("Promo codes are only valid for orders over {minimum}")]
    BelowThreshold {
        /// Minimum subtotal needed
        minimum: Money<'static, Currency>,
    },

    /// The code isn't one we know.
    #[error("Invalid promo code")]
    InvalidCode(String),
}

/// A known promo code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    code: String,
    discount: Decimal,
}

impl PromoCode {
    /// Create a promo code. The code is normalised to upper case.
    pub fn new(code: &str, discount: Decimal) -> Self {
        Self {
            code: normalise(code),
            discount,
        }
    }

    /// The normalised code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Amount deducted, in major units
    pub fn discount(&self) -> Decimal {
        self.discount
    }
}

/// A successfully applied promo code.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    /// The normalised code
    pub code: String,

    /// Amount deducted from the subtotal
    pub discount: Money<'static, Currency>,
}

impl fmt::Display for AppliedPromo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Promo code applied! {} off", self.discount)
    }
}

/// The set of promo codes accepted at checkout.
#[derive(Debug, Clone)]
pub struct PromoTable {
    codes: FxHashMap<String, PromoCode>,
    minimum_order: Decimal,
}

impl PromoTable {
    /// The marketplace's codes: `SAVE10`, `SAVE20` and `LEARN50`.
    pub fn standard() -> Self {
        Self::with_codes(
            [
                PromoCode::new("SAVE10", Decimal::from(10)),
                PromoCode::new("SAVE20", Decimal::from(20)),
                PromoCode::new("LEARN50", Decimal::from(50)),
            ],
            MINIMUM_ORDER_THRESHOLD,
        )
    }

    /// Build a table from a fixed list of codes.
    pub fn with_codes(codes: impl IntoIterator<Item = PromoCode>, minimum_order: Decimal) -> Self {
        let codes = codes
            .into_iter()
            .map(|promo| (promo.code.clone(), promo))
            .collect();

        Self {
            codes,
            minimum_order,
        }
    }

    /// Look up a code, ignoring case and surrounding whitespace.
    pub fn get(&self, code: &str) -> Option<&PromoCode> {
        self.codes.get(&normalise(code))
    }

    /// Minimum subtotal, in major units
    pub fn minimum_order(&self) -> Decimal {
        self.minimum_order
    }

    /// Whether `subtotal` is large enough to take a promo code.
    pub fn meets_minimum(&self, subtotal: &Money<'_, Currency>) -> bool {
        *subtotal.amount() >= self.minimum_order
    }

    /// Known codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.codes.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Validate `raw` against `cart`.
    ///
    /// # Errors
    ///
    /// - [`PromoError::EmptyCode`]: `raw` is blank.
    /// - [`PromoError::BelowThreshold`]: the cart subtotal is under the minimum order.
    /// - [`PromoError::InvalidCode`]: the code isn't in the table.
    pub fn apply(&self, cart: &Cart, raw: &str) -> Result<AppliedPromo, PromoError> {
        let code = normalise(raw);

        if code.is_empty() {
            return Err(PromoError::EmptyCode);
        }

        let subtotal = compute_subtotal(cart);

        if !self.meets_minimum(&subtotal) {
            debug!(%subtotal, "promo rejected below minimum order");

            return Err(PromoError::BelowThreshold {
                minimum: Money::from_decimal(self.minimum_order, cart.currency()),
            });
        }

        let promo = self
            .codes
            .get(&code)
            .ok_or_else(|| PromoError::InvalidCode(code.clone()))?;

        Ok(AppliedPromo {
            code,
            discount: Money::from_decimal(promo.discount, cart.currency()),
        })
    }
}

impl Default for PromoTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalise(code: &str) -> String {
    code.trim().to_uppercase()
}

//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartEntry},
    pricing::PricingState,
    promotions::AppliedPromo,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Output could not be written.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Summary of a cart at checkout.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Purchased courses, in cart order
    entries: Vec<CartEntry>,

    /// Total cost before any promo code
    subtotal: Money<'static, Currency>,

    /// Amount taken off by the promo code
    discount: Money<'static, Currency>,

    /// Total amount paid
    total: Money<'static, Currency>,

    /// Applied promo code, if any
    promo_code: Option<String>,
}

impl Receipt {
    /// Snapshot `cart` with its derived pricing.
    pub fn new(cart: &Cart, pricing: PricingState, promo: Option<&AppliedPromo>) -> Self {
        Self {
            entries: cart.entries().to_vec(),
            subtotal: pricing.subtotal,
            discount: pricing.discount,
            total: pricing.total,
            promo_code: promo.map(|applied| applied.code.clone()),
        }
    }

    /// Purchased courses
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Total cost before any promo code
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Amount taken off by the promo code
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Total amount paid
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Applied promo code
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Calculate the savings made by the promo code.
    ///
    /// This can be smaller than the discount when the discount exceeded the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Writes the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written or the totals don't add up.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["#", "Course", "Level", "Duration", "Price"]);

        for (idx, entry) in self.entries.iter().enumerate() {
            let course = entry.course();

            builder.push_record([
                (idx + 1).to_string(),
                course.name.clone(),
                course.level.to_string(),
                course.duration.clone(),
                course.price.to_money(self.subtotal.currency()).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(4..5), Alignment::right());

        writeln!(out, "\n{table}")?;
        writeln!(out, " Subtotal: {}", self.subtotal)?;

        if !self.discount.is_zero() {
            let code = self.promo_code.as_deref().unwrap_or("promo");

            writeln!(out, " Discount ({code}): -{}", self.savings()?)?;
        }

        writeln!(out, " Total: {}", self.total)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{cart::CartEntry, fixtures::course};

    use super::*;

    fn cart() -> Cart {
        Cart::with_entries(
            [CartEntry::new(course(1, 100)), CartEntry::new(course(2, 50))],
            iso::USD,
        )
    }

    fn applied(code: &str, minor: i64) -> AppliedPromo {
        AppliedPromo {
            code: code.to_string(),
            discount: Money::from_minor(minor, iso::USD),
        }
    }

    #[test]
    fn accessors_return_values_from_constructor() -> TestResult {
        let cart = cart();
        let promo = applied("SAVE20", 20_00);
        let pricing = PricingState::derive(&cart, Some(promo.discount))?;

        let receipt = Receipt::new(&cart, pricing, Some(&promo));

        assert_eq!(receipt.entries().len(), 2);
        assert_eq!(receipt.subtotal(), Money::from_minor(150_00, iso::USD));
        assert_eq!(receipt.discount(), Money::from_minor(20_00, iso::USD));
        assert_eq!(receipt.total(), Money::from_minor(130_00, iso::USD));
        assert_eq!(receipt.promo_code(), Some("SAVE20"));

        Ok(())
    }

    #[test]
    fn savings_is_subtotal_minus_total() -> TestResult {
        let cart = cart();
        let pricing = PricingState::derive(&cart, Some(Money::from_minor(10_00, iso::USD)))?;

        let receipt = Receipt::new(&cart, pricing, None);

        assert_eq!(receipt.savings()?, Money::from_minor(10_00, iso::USD));

        Ok(())
    }

    #[test]
    fn write_to_lists_courses_and_totals() -> TestResult {
        let cart = cart();
        let promo = applied("SAVE20", 20_00);
        let pricing = PricingState::derive(&cart, Some(promo.discount))?;
        let receipt = Receipt::new(&cart, pricing, Some(&promo));

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Course 1"), "{rendered}");
        assert!(rendered.contains("Course 2"), "{rendered}");
        assert!(rendered.contains("Subtotal"), "{rendered}");
        assert!(rendered.contains("Discount (SAVE20)"), "{rendered}");
        assert!(rendered.contains("Total"), "{rendered}");

        Ok(())
    }

    #[test]
    fn write_to_omits_discount_line_without_promo() -> TestResult {
        let cart = cart();
        let pricing = PricingState::derive(&cart, None)?;
        let receipt = Receipt::new(&cart, pricing, None);

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(!rendered.contains("Discount"), "{rendered}");

        Ok(())
    }
}

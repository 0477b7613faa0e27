//! Cart

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    courses::{Course, CourseId},
    pricing::compute_subtotal,
};

/// A course snapshot held in a cart.
///
/// Captured when the course is added and never refreshed from the catalog,
/// so later catalog price changes don't affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartEntry {
    course: Course,
}

impl CartEntry {
    /// Snapshot a course.
    pub fn new(course: Course) -> Self {
        Self { course }
    }

    /// Course identifier
    pub fn id(&self) -> CourseId {
        self.course.id
    }

    /// The snapshotted course
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Unwrap into the snapshotted course
    pub fn into_course(self) -> Course {
        self.course
    }
}

impl From<Course> for CartEntry {
    fn from(course: Course) -> Self {
        Self::new(course)
    }
}

/// Cart
///
/// Ordered by insertion, with at most one entry per course id.
#[derive(Debug, Clone)]
pub struct Cart {
    entries: Vec<CartEntry>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new, empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            entries: Vec::new(),
            currency,
        }
    }

    /// Create a cart from previously stored entries.
    ///
    /// Later duplicates of an id are dropped, keeping the first occurrence.
    pub fn with_entries(
        entries: impl IntoIterator<Item = CartEntry>,
        currency: &'static Currency,
    ) -> Self {
        let mut cart = Cart::new(currency);

        for entry in entries {
            cart.insert(entry);
        }

        cart
    }

    /// Append an entry unless one with the same id already exists.
    ///
    /// Returns whether the entry was inserted.
    pub fn insert(&mut self, entry: CartEntry) -> bool {
        if self.contains(entry.id()) {
            return false;
        }

        self.entries.push(entry);

        true
    }

    /// Remove the entry for `id`, if present.
    pub fn remove(&mut self, id: CourseId) -> Option<CartEntry> {
        let idx = self.entries.iter().position(|entry| entry.id() == id)?;

        Some(self.entries.remove(idx))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check whether a course is in the cart.
    pub fn contains(&self, id: CourseId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    /// Look up an entry by course id.
    pub fn get(&self, id: CourseId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Calculate the subtotal of the cart.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        compute_subtotal(self)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter()
    }

    /// Get the number of distinct courses in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl PartialEq for Cart {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::fixtures::course;

    use super::*;

    fn test_entries() -> [CartEntry; 3] {
        [
            CartEntry::new(course(1, 40)),
            CartEntry::new(course(2, 60)),
            CartEntry::new(course(3, 80)),
        ]
    }

    #[test]
    fn new_with_currency() {
        let cart = Cart::new(iso::USD);

        assert_eq!(cart.currency(), iso::USD);
        assert!(cart.is_empty());
    }

    #[test]
    fn insert_preserves_order() -> TestResult {
        let cart = Cart::with_entries(test_entries(), iso::USD);

        let ids: Vec<u32> = cart.iter().map(|entry| entry.id().get()).collect();

        assert_eq!(ids, [1, 2, 3]);

        Ok(())
    }

    #[test]
    fn insert_duplicate_is_rejected() {
        let mut cart = Cart::new(iso::USD);

        assert!(cart.insert(CartEntry::new(course(7, 10))));
        assert!(!cart.insert(CartEntry::new(course(7, 99))));

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.entries().first().map(|entry| *entry.course().price),
            Some(Decimal::from(10))
        );
    }

    #[test]
    fn with_entries_keeps_first_duplicate() {
        let cart = Cart::with_entries(
            [
                CartEntry::new(course(1, 10)),
                CartEntry::new(course(2, 20)),
                CartEntry::new(course(1, 30)),
            ],
            iso::USD,
        );

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), Money::from_minor(30_00, iso::USD));
    }

    #[test]
    fn remove_returns_entry() -> TestResult {
        let mut cart = Cart::with_entries(test_entries(), iso::USD);

        let removed = cart.remove(CourseId::new(2)?);

        assert_eq!(removed.map(|entry| entry.id().get()), Some(2));
        assert_eq!(cart.len(), 2);
        assert!(!cart.contains(CourseId::new(2)?));

        Ok(())
    }

    #[test]
    fn remove_missing_is_noop() -> TestResult {
        let mut cart = Cart::with_entries(test_entries(), iso::USD);

        assert!(cart.remove(CourseId::new(42)?).is_none());
        assert_eq!(cart.len(), 3);

        Ok(())
    }

    #[test]
    fn subtotal_with_entries() {
        let cart = Cart::with_entries(test_entries(), iso::USD);

        assert_eq!(cart.subtotal(), Money::from_minor(180_00, iso::USD));
    }

    #[test]
    fn subtotal_with_no_entries() {
        let cart = Cart::new(iso::USD);

        assert_eq!(cart.subtotal(), Money::from_minor(0, iso::USD));
    }

    #[test]
    fn entry_serializes_as_course() -> TestResult {
        let entry = CartEntry::new(course(5, 25));

        assert_eq!(
            serde_json::to_value(&entry)?,
            serde_json::to_value(entry.course())?
        );

        Ok(())
    }
}

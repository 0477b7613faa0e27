//! Cart Store
//!
//! Owns the session's [`Cart`], keeps it in durable storage, and tracks the
//! promo code applied during this session.
//!
//! Mutations take `&mut self` and write storage before returning, so anything
//! that reads the store afterwards sees the change. Storage failures are
//! logged and reported to the observer, but never fail the mutation: the
//! in-memory cart stays authoritative for the rest of the session.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartEntry},
    courses::{Course, CourseId},
    pricing::PricingState,
    promotions::{AppliedPromo, PromoError, PromoTable},
    receipt::Receipt,
    storage::{CART_STORAGE_KEY, CartStorage, StorageError},
};

/// Errors from checking out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to pay for.
    #[error("Your cart is empty!")]
    EmptyCart,
}

/// Result of adding a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The course was appended to the cart.
    Added,

    /// The course was already in the cart; nothing changed.
    Duplicate,
}

impl AddOutcome {
    /// Whether the cart changed.
    pub fn is_inserted(self) -> bool {
        matches!(self, AddOutcome::Added)
    }

    /// Notice to show the user.
    pub fn message(self) -> &'static str {
        match self {
            AddOutcome::Added => "Course added to cart!",
            AddOutcome::Duplicate => "Course already in cart!",
        }
    }
}

/// Change notifications emitted by a [`CartStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// The cart was (re)loaded from storage.
    Restored {
        /// Number of entries restored
        count: usize,
    },

    /// A course was added.
    Added(CourseId),

    /// A course was already present.
    Duplicate(CourseId),

    /// A course was removed.
    Removed(CourseId),

    /// The cart was emptied.
    Cleared,

    /// A promo code was applied.
    DiscountApplied(AppliedPromo),

    /// The applied promo code no longer holds.
    DiscountCleared,

    /// Storage couldn't be written; the change only lives in memory.
    PersistFailed(String),
}

/// Observer for cart changes.
///
/// Callers re-derive whatever they display (pricing, badges) from here rather
/// than polling the store.
pub trait CartObserver: Send {
    /// Called after every change, with the cart as it now stands.
    fn on_change(&mut self, event: &CartEvent, cart: &Cart);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_change(&mut self, _event: &CartEvent, _cart: &Cart) {}
}

/// The session's cart, backed by durable storage.
#[derive(Debug)]
pub struct CartStore<S: CartStorage, O: CartObserver = NoopObserver> {
    storage: S,
    observer: O,
    promotions: PromoTable,
    cart: Cart,
    applied: Option<AppliedPromo>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store and restore any persisted cart.
    pub fn open(storage: S, currency: &'static Currency) -> Self {
        Self::with_observer(storage, currency, NoopObserver)
    }
}

impl<S: CartStorage, O: CartObserver> CartStore<S, O> {
    /// Open the store with an observer and restore any persisted cart.
    pub fn with_observer(storage: S, currency: &'static Currency, observer: O) -> Self {
        let mut store = Self {
            storage,
            observer,
            promotions: PromoTable::standard(),
            cart: Cart::new(currency),
            applied: None,
        };

        store.load_persisted();

        store
    }

    /// Replace the promo table.
    #[must_use]
    pub fn with_promotions(mut self, promotions: PromoTable) -> Self {
        self.promotions = promotions;
        self
    }

    /// Re-read the cart from storage.
    ///
    /// Missing, unreadable, or unparseable payloads give an empty cart. Any
    /// applied promo code is dropped.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn load_persisted(&mut self) -> &Cart {
        let currency = self.cart.currency();

        let entries = match self.storage.get(CART_STORAGE_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<CartEntry>>(&payload) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(error = %err, "discarding unparseable stored cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read stored cart");
                Vec::new()
            }
        };

        self.cart = Cart::with_entries(entries, currency);
        self.applied = None;

        debug!(count = self.cart.len(), "restored cart");
        self.notify(&CartEvent::Restored {
            count: self.cart.len(),
        });

        &self.cart
    }

    /// Add a course snapshot, unless it's already in the cart.
    #[tracing::instrument(level = "debug", skip_all, fields(course_id = %course.id))]
    pub fn add_course(&mut self, course: Course) -> AddOutcome {
        let id = course.id;

        if !self.cart.insert(CartEntry::new(course)) {
            debug!("course already in cart");
            self.notify(&CartEvent::Duplicate(id));

            return AddOutcome::Duplicate;
        }

        self.persist();

        info!(count = self.cart.len(), "added course to cart");
        self.notify(&CartEvent::Added(id));

        AddOutcome::Added
    }

    /// Remove a course. Removing a course that isn't there does nothing.
    ///
    /// If a promo code is applied and the subtotal falls below the minimum
    /// order, the promo code is dropped as well.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn remove_course(&mut self, id: CourseId) -> Option<CartEntry> {
        let removed = self.cart.remove(id)?;

        self.persist();

        info!(count = self.cart.len(), "removed course from cart");
        self.notify(&CartEvent::Removed(id));

        if self.applied.is_some() && !self.promotions.meets_minimum(&self.cart.subtotal()) {
            self.applied = None;

            info!("promo code dropped below minimum order");
            self.notify(&CartEvent::DiscountCleared);
        }

        Some(removed)
    }

    /// Empty the cart, drop any promo code, and remove the stored cart.
    ///
    /// If the stored cart can't be removed it is overwritten with an empty
    /// one, so a later load never restores the cleared courses.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        self.applied = None;

        if let Err(err) = self.storage.remove(CART_STORAGE_KEY) {
            warn!(error = %err, "failed to remove stored cart; overwriting it");

            if let Err(err) = self.storage.set(CART_STORAGE_KEY, "[]") {
                self.persist_failed(&err);
            }
        }

        info!("cleared cart");
        self.notify(&CartEvent::Cleared);
    }

    /// Apply a promo code to the current cart.
    ///
    /// A failed attempt leaves any previously applied code in place.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`PromoError`] condition.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn apply_promo_code(&mut self, raw: &str) -> Result<&AppliedPromo, PromoError> {
        let applied = self.promotions.apply(&self.cart, raw)?;

        info!(code = %applied.code, discount = %applied.discount, "applied promo code");
        self.notify(&CartEvent::DiscountApplied(applied.clone()));

        Ok(&*self.applied.insert(applied))
    }

    /// Pay for the cart: produce a receipt, then clear the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there's nothing in the cart.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn checkout(&mut self) -> Result<Receipt, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let receipt = Receipt::new(&self.cart, self.pricing(), self.applied.as_ref());

        info!(
            count = receipt.entries().len(),
            total = %receipt.total(),
            "checked out"
        );

        self.clear();

        Ok(receipt)
    }

    /// Derived pricing for the current cart and promo code.
    pub fn pricing(&self) -> PricingState {
        let discount = self.discount();
        let subtotal = self.cart.subtotal();

        PricingState::derive(&self.cart, Some(discount)).unwrap_or(PricingState {
            subtotal,
            discount: Money::from_minor(0, self.cart.currency()),
            total: subtotal,
        })
    }

    /// Currently applied discount, or zero.
    pub fn discount(&self) -> Money<'static, Currency> {
        self.applied.as_ref().map_or_else(
            || Money::from_minor(0, self.cart.currency()),
            |applied| applied.discount,
        )
    }

    /// Currently applied promo code.
    pub fn applied_promo(&self) -> Option<&AppliedPromo> {
        self.applied.as_ref()
    }

    /// Number of distinct courses in the cart.
    pub fn count(&self) -> usize {
        self.cart.len()
    }

    /// Whether a course is in the cart.
    pub fn contains(&self, id: CourseId) -> bool {
        self.cart.contains(id)
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The promo table in use.
    pub fn promotions(&self) -> &PromoTable {
        &self.promotions
    }

    /// The observer, e.g. to inspect what it recorded.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(self.cart.entries())
            .map_err(|err| StorageError::Io(err.into()))
            .and_then(|payload| self.storage.set(CART_STORAGE_KEY, &payload));

        if let Err(err) = result {
            self.persist_failed(&err);
        }
    }

    fn persist_failed(&mut self, err: &StorageError) {
        warn!(error = %err, "failed to persist cart; keeping in-memory state");
        self.notify(&CartEvent::PersistFailed(err.to_string()));
    }

    fn notify(&mut self, event: &CartEvent) {
        self.observer.on_change(event, &self.cart);
    }
}

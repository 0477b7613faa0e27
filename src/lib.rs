//! Coursecart
//!
//! Cart, promo code pricing and catalog access for an online course marketplace.

pub mod cart;
pub mod catalog;
pub mod courses;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod promotions;
pub mod receipt;
pub mod storage;
pub mod store;

#[cfg(test)]
mod fixtures;

//! Cart storage config

use std::path::PathBuf;

use clap::Args;
use rusty_money::{Findable, iso::Currency};
use thiserror::Error;

/// Unknown currency code
#[derive(Debug, Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(String);

/// Where the cart is kept.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory the cart is saved in
    #[arg(long, env = "COURSECART_DATA_DIR", default_value = ".coursecart")]
    pub data_dir: PathBuf,

    /// ISO 4217 currency of catalog prices
    #[arg(long, env = "COURSECART_CURRENCY", default_value = "USD")]
    pub currency: String,
}

impl StorageConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the code isn't a known ISO currency.
    pub fn currency(&self) -> Result<&'static Currency, UnknownCurrency> {
        Currency::find(&self.currency.to_ascii_uppercase())
            .ok_or_else(|| UnknownCurrency(self.currency.clone()))
    }
}

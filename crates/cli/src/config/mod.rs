//! CLI configuration module

use clap::Parser;

use crate::{
    commands::Command,
    config::{catalog::CatalogConfig, observability::LoggingConfig, storage::StorageConfig},
};

pub(crate) mod catalog;
pub(crate) mod observability;
pub(crate) mod storage;

/// Coursecart CLI configuration
#[derive(Debug, Parser)]
#[command(name = "coursecart", about = "Browse courses and manage your cart", long_about = None)]
pub struct CliConfig {
    /// Catalog source settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

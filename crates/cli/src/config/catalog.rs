//! Catalog source config

use std::{path::PathBuf, time::Duration};

use clap::Args;
use coursecart::catalog::{COURSES_FILE, FetchPolicy, INSTRUCTORS_FILE};

/// Where the course and instructor listings come from.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Directory holding the listing files
    #[arg(long, env = "COURSECART_CATALOG_DIR", default_value = "fixtures/catalog")]
    pub catalog_dir: PathBuf,

    /// Base URL serving the listings; takes precedence over the directory
    #[arg(long, env = "COURSECART_CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// Course listing file name
    #[arg(long, env = "COURSECART_COURSES_FILE", default_value = COURSES_FILE)]
    pub courses_file: String,

    /// Instructor listing file name
    #[arg(long, env = "COURSECART_INSTRUCTORS_FILE", default_value = INSTRUCTORS_FILE)]
    pub instructors_file: String,

    /// Per-attempt fetch timeout in milliseconds
    #[arg(long, env = "COURSECART_FETCH_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub fetch_timeout_ms: u64,

    /// Fetch attempts before the catalog is reported unavailable
    #[arg(long, env = "COURSECART_FETCH_ATTEMPTS", default_value_t = 3_u32)]
    pub fetch_attempts: u32,

    /// Pause between fetch attempts in milliseconds
    #[arg(long, env = "COURSECART_FETCH_BACKOFF_MS", default_value_t = 250_u64)]
    pub fetch_backoff_ms: u64,
}

impl CatalogConfig {
    /// Timeout and retry settings
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_millis(self.fetch_timeout_ms),
            attempts: self.fetch_attempts,
            backoff: Duration::from_millis(self.fetch_backoff_ms),
        }
    }
}

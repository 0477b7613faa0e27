//! Coursecart CLI

use tracing::debug;

use crate::config::CliConfig;

mod commands;
mod config;
mod observability;
mod output;

/// Coursecart CLI entry point
#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let config = CliConfig::load().unwrap_or_else(|err| err.exit());

    observability::init(&config.logging)?;

    debug!(command = ?config.command, "starting");

    commands::run(&config).await
}

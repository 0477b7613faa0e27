//! Logging config
//!
//! Controls the diagnostics written to stderr while a command runs. Command
//! output on stdout is unaffected, so the default level only shows warnings
//! such as a cart that couldn't be saved or a catalog fetch being retried.

use clap::Args;

/// Format of the diagnostics on stderr.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event, for reading in a terminal.
    Compact,

    /// One JSON object per event, for piping into log tooling.
    Json,
}

/// Logging settings for a single CLI run.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

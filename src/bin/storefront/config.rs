//! Storefront configuration

use std::path::PathBuf;

use clap::{Args, Parser};

/// Storefront CLI configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront ordering menu", long_about = None)]
pub(crate) struct Config {
    /// Directory holding the fixture sets
    #[arg(long, env = "STOREFRONT_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set used to stock the store
    #[arg(short, long, env = "STOREFRONT_CATALOG", default_value = "best_buy")]
    pub catalog: String,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

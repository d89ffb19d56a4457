//! Command line
//!
//! Arguments and logging setup for the `storefront-cart` binary, which replays an action
//! log against a configured cart and prints the resulting receipt.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{
    EnvFilter,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable, one line per event
    Compact,

    /// One JSON object per event
    Json,
}

/// Replay a cart action log and print the receipt
#[derive(Debug, Parser)]
#[command(name = "storefront-cart", about = "Replay a cart action log", long_about = None)]
pub struct CliArgs {
    /// YAML action log to replay
    #[arg(short, long, env = "CART_ACTIONS")]
    pub actions: PathBuf,

    /// YAML pricing configuration; a free delivery GBP cart is used when omitted
    #[arg(short, long, env = "CART_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot to restore before replaying
    #[arg(short, long, env = "CART_RESTORE")]
    pub restore: Option<PathBuf>,

    /// Where to write the cart snapshot after replaying
    #[arg(short, long, env = "CART_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Print the order summary as JSON instead of a receipt
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// Load arguments from the environment and command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be parsed.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Install the global tracing subscriber. Logs go to stderr so stdout stays clean for the
/// receipt.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter = log_filter(level);

    let fmt_layer = match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
}

/// Filter for the given directives. `RUST_LOG` reaches this through `--log-level`, so an
/// explicit flag always wins over the environment.
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::new(level)
}

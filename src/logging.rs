//! Logging setup for the binary.
//!
//! Everything goes to stderr: in stdio mode stdout is the MCP channel and
//! a stray log line there corrupts the protocol stream.

use crate::Settings;
use tracing::Level;

/// Parse a configured level name, defaulting to `INFO`.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global fmt subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(settings: &Settings) {
    let level = parse_level(settings.log_level());

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

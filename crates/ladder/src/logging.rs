//! Logging setup.
//!
//! Installs a global `tracing` subscriber writing human-readable lines to
//! stderr, keeping stdout free for program output. `RUST_LOG` takes
//! precedence over the verbosity-derived default filter.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use ladder_core::{Error, Result};

/// Outcome of the first install attempt, shared by every later call.
static INSTALLED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Default filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the global subscriber. Subsequent calls, including concurrent
/// ones, wait for the first and return its outcome.
pub fn init(verbosity: u8) -> Result<()> {
    INSTALLED
        .get_or_init(|| {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(|e| Error::msg(format!("failed to install tracing subscriber: {e}")))
}

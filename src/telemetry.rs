//! Logging setup
//!
//! Library code only emits `tracing` events; binaries and tests call
//! [`init`] once to print them.

use tracing_subscriber::EnvFilter;

use crate::config::TrianglerConfig;
use crate::{Error, Result};

/// Default filter directive for a configuration (`RUST_LOG` overrides it).
#[must_use]
pub const fn default_directive(config: &TrianglerConfig) -> &'static str {
    if config.debug {
        "triangler=debug"
    } else {
        "triangler=info"
    }
}

/// Install a global `fmt` subscriber.
///
/// # Errors
///
/// Returns `Error::Other` if a global subscriber is already installed.
pub fn init(config: &TrianglerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Other(format!("tracing subscriber already installed: {e}")))
}

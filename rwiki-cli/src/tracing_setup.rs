//! Tracing initialization.
//!
//! Usage:
//!   rwiki --debug serve          # Debug logging to console
//!   RUST_LOG=rwiki=debug rwiki   # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize console tracing. RUST_LOG wins over the --debug flag.
pub fn init_tracing(debug: bool) -> Result<()> {
    let fallback = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

//! Tracing Setup
//!
//! Installs a `tracing_subscriber` formatter for hosts that do not bring
//! their own. `RUST_LOG` overrides the configured filter.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AuthzConfig;

/// Filter from `RUST_LOG`, falling back to `config.log_filter`.
fn env_filter(config: &AuthzConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Install the global subscriber.
///
/// Fails instead of panicking when a subscriber is already installed, so
/// the host's own setup wins.
pub fn init_tracing(config: &AuthzConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config));

    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install tracing subscriber")
}

//! Tracing setup for the CLI.
//!
//! Logs go to stderr so they never mix with report output on stdout. The
//! level is controlled via the `BITACORA_LOG` environment variable
//! (`debug`, `info`, `warn`, `error`), defaulting to `info`.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub fn init() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("BITACORA_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(())
}

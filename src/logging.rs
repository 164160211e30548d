use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "PAGE_LOADER_LOG";

/// Initialize structured logging to stderr, filtered by `PAGE_LOADER_LOG`.
///
/// Stdout is left alone so it only ever carries the saved page path.
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    tracing::debug!("page-loader logging initialized");

    Ok(())
}

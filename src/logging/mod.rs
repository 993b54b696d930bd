// Logging module for structured logging using the tracing crate

use std::error::Error;

/// Initialize the tracing subscriber for structured logging
///
/// This function sets up the tracing subscriber that will receive and process
/// log events throughout the pipeline.
///
/// The subscriber is configured with:
/// - Filtering via `RUST_LOG` (defaulting to `info` when unset)
/// - Compact formatting suitable for an extension host console
///
/// Interception swallows its errors by contract, so this subscriber is the
/// only place those fallbacks become visible.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed, though
/// callers typically treat that as benign (tests initialize repeatedly).
pub fn init_subscriber() -> Result<(), Box<dyn Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()?;

    Ok(())
}

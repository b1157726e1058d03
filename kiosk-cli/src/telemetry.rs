//! Logging setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. `json` selects
/// the JSON formatter. Calling this twice keeps the first subscriber.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = if json { builder.json().try_init() } else { builder.try_init() };
    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}

//! Diagnostic tracing for devkit itself.
//!
//! Progress lines meant for the user are printed to stdout by the commands;
//! this subscriber only carries `tracing` events, filtered by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr in the
/// compact format.
///
/// ```bash
/// RUST_LOG=devkit=debug devkit example hello_world
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

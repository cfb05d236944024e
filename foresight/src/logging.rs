//! Development-time tracing for debugging runs.
//!
//! Diagnostics go to stderr via `RUST_LOG`; they are never part of command
//! output, which is written to stdout as JSON.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, which still shows skipped
/// (unreachable) targets. Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=foresight=debug cargo run -p foresight -- run --seed 7
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

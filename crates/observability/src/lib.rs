//! `warden-observability` — shared tracing/logging setup.
//!
//! The decision engine only emits `tracing` events; binaries and integration
//! tests that want to see them call into here.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing with JSON output.
///
/// Filtering follows `RUST_LOG` (default `info`). Safe to call multiple
/// times; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}

/// Initialize compact human-readable tracing, for local debugging and test
/// runs. Same idempotence as [`init`].
pub fn init_compact() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install JSON logging filtered by `RUST_LOG`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Human-readable output routed through the test harness' captured stdout.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .compact()
        .with_test_writer()
        .try_init();
}

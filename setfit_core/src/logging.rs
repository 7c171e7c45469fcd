//! Tracing setup shared by every Get Set Fit binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber at the default `info` level.
///
/// `RUST_LOG` always wins over the default, so a one-off
/// `RUST_LOG=setfit_core=debug setfit start ...` needs no code change.
pub fn init() {
    init_with_level("info")
}

/// Install the global subscriber with an explicit default level
/// (`debug`, `info`, `warn`, `error`).
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Subscriber for tests: writes through the test harness capture and
/// tolerates repeated installation across the test binary.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

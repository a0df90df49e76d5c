//! Tracing subscriber setup for applications embedding the effect pipeline.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Install a formatted `tracing` subscriber filtered by `RUST_LOG`
/// (default `info`). Safe to call repeatedly; only the first call installs.
/// A subscriber installed elsewhere beforehand is left in place.
pub fn init() {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .is_err()
        {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}

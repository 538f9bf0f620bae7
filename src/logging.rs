//! Logging setup built on `tracing` and `tracing-subscriber`.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber.
///
/// The filter is read from `RUST_LOG` and falls back to `info`, e.g.
/// `RUST_LOG=easyappoint_calendar=debug`.
///
/// ```no_run
/// easyappoint_calendar::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber for tests. Safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

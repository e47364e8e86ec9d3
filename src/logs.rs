//! Logging setup for programs built on this crate.
//!
//! The library itself only emits `tracing` events; nothing is printed unless
//! the embedding program installs a subscriber, for instance with
//! [`init_logging`].

use std::env;

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber for the crate's `tracing` events.
///
/// If the `DEBUG` environment variable is set, everything at `debug` level
/// and above is shown. Otherwise `RUST_LOG` is honoured, defaulting to
/// `warn`. Calling it again after a subscriber is installed does nothing.
pub fn init_logging() {
    let filter = if env::var("DEBUG").is_ok() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

//! # handymenu-logging
//!
//! Structured logging setup for Handy Menu.
//!
//! Every crate logs through `tracing` macros with structured fields. This
//! crate installs the process-wide subscriber and provides
//! [`capture_logs`] for asserting on emitted events in tests.

#![deny(unsafe_code)]

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

use handymenu_settings::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` takes precedence over `level` when set. Call once at startup;
/// later calls are no-ops.
pub fn init_subscriber(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}

/// [`init_subscriber`] with the configured level.
pub fn init_from_settings(settings: &LoggingSettings) {
    init_subscriber(&settings.level);
}

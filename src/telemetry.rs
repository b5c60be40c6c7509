//! Tracing subscriber setup for the server binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global fmt subscriber filtered by `directive`.
///
/// Falls back to `info` when the directive does not parse. Calling this
/// twice is a no-op for the second call.
pub fn init_tracing(directive: &str) {
    let env_filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .try_init();
}

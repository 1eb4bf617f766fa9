//! Logging utilities for the Navbat application.
//!
//! This module provides a standardized approach to logging across all
//! crates. It initializes the tracing subscriber with an env-filter so
//! `RUST_LOG` keeps working in every deployment.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific minimum log level.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("navbat={}", level).parse().unwrap());

    // try_init so tests that initialize logging twice do not panic.
    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

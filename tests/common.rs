// tests/common.rs
//! Tracing setup for integration tests

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route resource events through the test writer, filtered by `RUST_LOG`
#[allow(dead_code)]
pub fn setup() {
    #[cfg(feature = "logging")]
    install(EnvFilter::from_default_env());
}

/// Same as [`setup`] but always at debug level, so salt draws and
/// derivation parameters show up without `RUST_LOG`
#[allow(dead_code)]
pub fn setup_debug() {
    #[cfg(feature = "logging")]
    install(EnvFilter::new("debug"));
}

#[cfg(feature = "logging")]
fn install(filter: EnvFilter) {
    // a second test in the same binary finds the subscriber already set
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(filter)
        .try_init();
}

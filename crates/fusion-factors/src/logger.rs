//! Logging setup for binaries, examples and tests that use the factors.
//!
//! The library itself only emits `tracing` events (factor creation at
//! `DEBUG`, covariance fallbacks at `WARN`); installing a subscriber is left
//! to the application.

use tracing::Level;

/// Installs a `tracing` fmt subscriber with the default level `INFO`.
///
/// The level can be overridden with `RUST_LOG`.
///
/// # Example
/// ```no_run
/// use fusion_factors::init_logger;
///
/// init_logger();
/// tracing::info!("estimator started");
/// ```
pub fn init_logger() {
    init_logger_with_level(Level::INFO)
}

/// Installs a `tracing` fmt subscriber with a custom default level.
///
/// # Example
/// ```no_run
/// use fusion_factors::init_logger_with_level;
/// use tracing::Level;
///
/// init_logger_with_level(Level::DEBUG);
/// tracing::debug!("factor creation will be logged");
/// ```
pub fn init_logger_with_level(default_level: Level) {
    // A second call (e.g. from another test in the same binary) keeps the
    // subscriber that is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}

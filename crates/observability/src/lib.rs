//! Tracing and logging setup shared by binaries.

/// Environment-driven settings (`RUST_LOG`, `CROWDFUND_LOG_FORMAT`).
pub mod config;

/// Tracing subscriber installation.
pub mod tracing;

pub use config::{ConfigError, LogFormat, ObservabilityConfig};

/// Initialize process-wide tracing from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() -> Result<(), ConfigError> {
    let config = ObservabilityConfig::from_env()?;
    tracing::init(&config);
    Ok(())
}

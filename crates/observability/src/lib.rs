//! Tracing and logging setup shared by the binaries.

pub use crate::tracing::{LogFormat, TracingConfig, UnknownLogFormat};

/// Install the process-wide subscriber from an explicit configuration.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init(config: &TracingConfig) {
    tracing::init(config);
}

/// Tracing configuration (filters, output format).
pub mod tracing;

//! Shared tracing/logging setup.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide logging. Later calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

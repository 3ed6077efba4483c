//! Tracing/logging setup shared by the backend binary and client hosts.

/// Initialize process-wide observability (tracing/logging).
///
/// Output format comes from `CINEDEX_LOG_FORMAT`. This is safe to call
/// multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;

//! Tracing and logging setup shared by every binary and test harness.

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use crate::tracing::{init, init_with, LogFormat};

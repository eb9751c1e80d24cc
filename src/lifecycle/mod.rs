//! Wiring and teardown of the stores, plus process-wide logging.

pub mod dashboard;
pub mod tracing;

pub use dashboard::*;

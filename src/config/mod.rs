//! Configuration model for pidguard.
//!
//! This module defines the `PidFileConfig` struct: every knob a guard
//! takes at construction. It supports forward-compatible YAML parsing
//! (unknown fields are ignored), sensible defaults for optional fields,
//! and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::PidFileConfig;
pub use types::{DEFAULT_MODE, PIDFILE_SUFFIX, SignalHandler, SignalPolicy};

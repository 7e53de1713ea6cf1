//! Configuration types and defaults for pidguard.
//!
//! This module defines enums, constants, and default value functions
//! used by the `PidFileConfig` struct.

use serde::{Deserialize, Serialize};

/// Suffix appended to pidfile names when suffix enforcement is enabled.
pub const PIDFILE_SUFFIX: &str = ".pid";

/// Permission bits applied to a freshly written pidfile.
pub const DEFAULT_MODE: u32 = 0o644;

/// A raw SIGTERM handler, installed as-is.
pub type SignalHandler = extern "C" fn(libc::c_int);

/// What to do with the process-wide SIGTERM disposition during setup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalPolicy {
    /// Leave the current disposition alone.
    Disabled,
    /// Install the default handler, which exits the process so exit hooks run.
    Enabled,
    /// Install the default handler only while no other handler is installed.
    #[default]
    Auto,
    /// Install the given handler.
    #[serde(skip)]
    Custom(SignalHandler),
}

impl SignalPolicy {
    /// Parse a signal policy from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "disabled" | "false" | "off" => Some(Self::Disabled),
            "enabled" | "true" | "on" => Some(Self::Enabled),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::Auto => "auto",
            Self::Custom(_) => "custom",
        }
    }
}

// Default value functions for serde
pub(crate) fn default_mode() -> Option<u32> {
    Some(DEFAULT_MODE)
}
pub(crate) fn default_true() -> bool {
    true
}

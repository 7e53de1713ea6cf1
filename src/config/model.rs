//! PidFileConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Constructor-time configuration for a pidfile guard.
///
/// Can be written by hand, built with the `with_*` methods, or loaded from
/// YAML. Unknown fields in the YAML are ignored for forward compatibility.
/// Nothing here can change once a `PidFile` has been set up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PidFileConfig {
    // =========================================================================
    // Location
    // =========================================================================
    /// Pidfile name. Defaults to the program's invocation name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Directory holding the pidfile. Defaults to the platform runtime directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Append `.pid` to the name unless it already ends with it.
    #[serde(default = "default_true")]
    pub enforce_suffix: bool,

    /// Skip the runtime directory and use the system temp directory.
    #[serde(default)]
    pub force_temp_dir: bool,

    // =========================================================================
    // Lifecycle
    // =========================================================================
    /// SIGTERM registration policy applied during setup.
    #[serde(default)]
    pub term_signal: SignalPolicy,

    /// Close (and clean up) the pidfile when the process exits.
    #[serde(default = "default_true")]
    pub register_exit_hook: bool,

    /// Take an exclusive advisory lock on the pidfile.
    #[serde(default = "default_true")]
    pub lock: bool,

    /// Treat a record holding our own pid as non-conflicting.
    #[serde(default)]
    pub allow_same_pid: bool,

    // =========================================================================
    // Ownership
    // =========================================================================
    /// Permission bits applied before writing the record (`None` or `0` leaves them alone).
    #[serde(default = "default_mode")]
    pub mode: Option<u32>,

    /// Owner applied before writing the record (`None` leaves it unchanged).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,

    /// Group applied before writing the record (`None` leaves it unchanged).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
}

impl Default for PidFileConfig {
    fn default() -> Self {
        Self {
            name: None,
            directory: None,
            enforce_suffix: default_true(),
            force_temp_dir: false,
            term_signal: SignalPolicy::default(),
            register_exit_hook: default_true(),
            lock: default_true(),
            allow_same_pid: false,
            mode: default_mode(),
            uid: None,
            gid: None,
        }
    }
}

impl PidFileConfig {
    /// Config for a named pidfile, everything else default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_enforce_suffix(mut self, enforce: bool) -> Self {
        self.enforce_suffix = enforce;
        self
    }

    pub fn with_force_temp_dir(mut self, force: bool) -> Self {
        self.force_temp_dir = force;
        self
    }

    pub fn with_term_signal(mut self, policy: SignalPolicy) -> Self {
        self.term_signal = policy;
        self
    }

    pub fn with_exit_hook(mut self, register: bool) -> Self {
        self.register_exit_hook = register;
        self
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_allow_same_pid(mut self, allow: bool) -> Self {
        self.allow_same_pid = allow;
        self
    }

    pub fn with_mode(mut self, mode: Option<u32>) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_owner(mut self, uid: Option<u32>, gid: Option<u32>) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    /// Permission bits to apply, if any. A zero mode means "leave them alone".
    pub fn effective_mode(&self) -> Option<u32> {
        self.mode.filter(|&mode| mode != 0)
    }
}

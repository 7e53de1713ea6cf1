//! Error types for pidguard.
//!
//! Uses thiserror for derive macros. Every variant maps to a distinct exit
//! code so the CLI can report *why* a guard could not be taken.

use crate::exit_codes;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a pidfile record could not be read.
#[derive(Error, Debug)]
pub enum UnreadableCause {
    /// Reading the file failed.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The record is not a decimal process id.
    #[error("invalid process id {content:?}: {source}")]
    Parse {
        content: String,
        #[source]
        source: ParseIntError,
    },
}

/// Main error type for pidfile operations.
#[derive(Error, Debug)]
pub enum PidFileError {
    /// The pidfile directory is missing, uncreatable, inaccessible or not a directory.
    #[error("pidfile directory '{}' {reason}", path.display())]
    Directory { path: PathBuf, reason: String },

    /// A requested option is not supported on this platform or is invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The advisory lock is already held by another owner.
    #[error("pidfile '{}' is locked by another process: {source}", path.display())]
    AlreadyLocked {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The record names a live process other than this one.
    #[error("{message}")]
    AlreadyRunning { pid: Option<u32>, message: String },

    /// The record is corrupt or could not be read.
    #[error("pidfile '{}' is unreadable: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: UnreadableCause,
    },

    /// Any other filesystem failure (open, write, delete).
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl PidFileError {
    pub(crate) fn already_running(pid: u32) -> Self {
        PidFileError::AlreadyRunning {
            pid: Some(pid),
            message: format!("program already running with pid: {}", pid),
        }
    }

    /// Fold an inconclusive liveness probe into "already running".
    pub(crate) fn probe_failed(pid: Option<u32>, err: io::Error) -> Self {
        let message = match pid {
            Some(pid) => format!("cannot determine whether pid {} is running: {}", pid, err),
            None => format!("pidfile is held by another process: {}", err),
        };
        PidFileError::AlreadyRunning { pid, message }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        PidFileError::Io {
            context: context.into(),
            source,
        }
    }

    /// The process id that was found running, if the error carries one.
    pub fn pid(&self) -> Option<u32> {
        match self {
            PidFileError::AlreadyRunning { pid, .. } => *pid,
            _ => None,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PidFileError::Directory { .. } => exit_codes::DIRECTORY_ERROR,
            PidFileError::Configuration(_) => exit_codes::USER_ERROR,
            PidFileError::AlreadyLocked { .. } => exit_codes::ALREADY_LOCKED,
            PidFileError::AlreadyRunning { .. } => exit_codes::ALREADY_RUNNING,
            PidFileError::Unreadable { .. } => exit_codes::UNREADABLE,
            PidFileError::Io { .. } => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for pidfile operations.
pub type Result<T> = std::result::Result<T, PidFileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_has_correct_exit_code() {
        let err = PidFileError::Configuration("chmod is not supported".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn lock_and_running_errors_are_distinguishable() {
        let locked = PidFileError::AlreadyLocked {
            path: PathBuf::from("/run/app.pid"),
            source: io::Error::from(io::ErrorKind::WouldBlock),
        };
        let running = PidFileError::already_running(42);
        assert_eq!(locked.exit_code(), exit_codes::ALREADY_LOCKED);
        assert_eq!(running.exit_code(), exit_codes::ALREADY_RUNNING);
        assert_ne!(locked.exit_code(), running.exit_code());
    }

    #[test]
    fn already_running_carries_pid() {
        let err = PidFileError::already_running(4242);
        assert_eq!(err.pid(), Some(4242));
        assert_eq!(err.to_string(), "program already running with pid: 4242");
    }

    #[test]
    fn probe_failure_is_reported_as_running() {
        let err = PidFileError::probe_failed(Some(7), io::Error::from_raw_os_error(1));
        assert!(matches!(err, PidFileError::AlreadyRunning { pid: Some(7), .. }));
        assert!(err.to_string().contains("cannot determine whether pid 7 is running"));
    }

    #[test]
    fn unreadable_wraps_parse_error() {
        let source = "abc".parse::<u32>().unwrap_err();
        let err = PidFileError::Unreadable {
            path: PathBuf::from("/tmp/x.pid"),
            source: UnreadableCause::Parse {
                content: "abc".to_string(),
                source,
            },
        };
        assert_eq!(err.exit_code(), exit_codes::UNREADABLE);
        assert!(err.to_string().contains("invalid process id \"abc\""));
        assert_eq!(err.pid(), None);
    }
}

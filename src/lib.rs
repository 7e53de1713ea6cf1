//! pidguard: single-instance process guarding with an advisory-locked pidfile.
//!
//! A [`PidFile`] answers "is an equivalent instance already running?" by
//! combining an exclusive advisory lock, the liveness of the pid recorded in
//! the file, and same-process reentry. While one instance lives, the file
//! holds its pid; on close (or drop, or process exit) the file is removed.
//!
//! ```no_run
//! use pidguard::{PidFileConfig, PidFileGuard};
//!
//! let _guard = PidFileGuard::acquire(PidFileConfig::named("worker"))?;
//! // ... only one `worker` gets here at a time ...
//! # Ok::<(), pidguard::PidFileError>(())
//! ```

pub mod config;
pub mod error;
pub mod exit_codes;
mod exit_hook;
pub mod path;
pub mod pidfile;
pub mod platform;
pub mod record;
pub mod signals;

#[cfg(test)]
mod test_support;

pub use config::{PidFileConfig, SignalPolicy};
pub use error::{PidFileError, Result};
pub use pidfile::{PidCheck, PidFile, PidFileGuard, with_pidfile};

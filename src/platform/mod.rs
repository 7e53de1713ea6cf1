//! Platform capabilities used by the pidfile lifecycle.
//!
//! Everything that differs between POSIX and other systems sits behind the
//! [`Platform`] trait: probing whether a pid is alive, taking the advisory
//! lock, applying permissions, and closing a handle. The lifecycle is written
//! once against the trait and [`native`] picks the implementation at compile
//! time.

use crate::config::PidFileConfig;
use crate::error::Result;
use std::fs::File;
use std::io;

#[cfg(unix)]
mod posix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use posix::Posix;
#[cfg(not(unix))]
pub use windows::Windows;

/// Capability set a pidfile needs from the operating system.
pub trait Platform: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Reject configuration this platform cannot honour.
    fn validate_config(&self, config: &PidFileConfig) -> Result<()>;

    /// Whether a process with this id exists.
    ///
    /// `Ok(false)` means "not running". An `Err` means the probe itself was
    /// inconclusive (for example permission denied).
    fn pid_exists(&self, pid: u32) -> io::Result<bool>;

    /// Take an exclusive, non-blocking advisory lock on `file`.
    fn try_lock_exclusive(&self, file: &File) -> io::Result<()>;

    /// Apply the configured permission bits and ownership to `file`.
    fn apply_ownership(&self, file: &File, config: &PidFileConfig) -> io::Result<()>;

    /// Close `file`, treating an already-closed descriptor as success.
    fn close_handle(&self, file: File) -> io::Result<()>;

    /// Whether a read failure means another handle holds the lock.
    fn read_denied_by_lock(&self, _err: &io::Error) -> bool {
        false
    }
}

/// The implementation for the platform this crate was built for.
pub fn native() -> &'static dyn Platform {
    #[cfg(unix)]
    {
        static NATIVE: Posix = Posix;
        &NATIVE
    }
    #[cfg(not(unix))]
    {
        static NATIVE: Windows = Windows;
        &NATIVE
    }
}

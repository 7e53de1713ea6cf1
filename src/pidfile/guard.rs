//! RAII pidfile guard.

use super::lifecycle::PidFile;
use crate::config::PidFileConfig;
use crate::error::Result;
use std::path::PathBuf;
use tracing::warn;

/// RAII guard holding a created pidfile.
///
/// When dropped, the pidfile is closed and removed. If that fails, a
/// warning is logged but no panic occurs.
#[derive(Debug)]
pub struct PidFileGuard {
    pidfile: PidFile,

    /// Whether the guard has been released manually.
    released: bool,
}

impl PidFileGuard {
    /// Build a pidfile from `config` and create it.
    pub fn acquire(config: PidFileConfig) -> Result<Self> {
        Self::from_pidfile(PidFile::new(config)?)
    }

    pub(super) fn from_pidfile(mut pidfile: PidFile) -> Result<Self> {
        pidfile.create()?;
        Ok(Self {
            pidfile,
            released: false,
        })
    }

    /// Get the path to the pidfile.
    pub fn path(&self) -> Option<PathBuf> {
        self.pidfile.path()
    }

    pub fn pidfile(&self) -> &PidFile {
        &self.pidfile
    }

    /// Manually release the pidfile.
    ///
    /// This is useful when you want to release before the guard goes out of
    /// scope, and want to handle errors explicitly.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.pidfile.close()
    }
}

impl Drop for PidFileGuard {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = self.pidfile.close()
        {
            warn!(path = ?self.pidfile.path(), error = %e, "failed to release pidfile");
        }
    }
}

/// Run `f` while holding the pidfile described by `config`.
///
/// The pidfile is released when `f` returns, including by unwinding.
pub fn with_pidfile<T, F>(config: PidFileConfig, f: F) -> Result<T>
where
    F: FnOnce(&PidFileGuard) -> T,
{
    let guard = PidFileGuard::acquire(config)?;
    let value = f(&guard);
    guard.release()?;
    Ok(value)
}

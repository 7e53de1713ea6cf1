//! Mutable per-guard state and the close/cleanup step.

use crate::error::{PidFileError, Result};
use crate::platform::Platform;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Everything a `PidFile` learns or acquires after construction.
///
/// Shared with the exit hook registry, so it lives behind a mutex.
#[derive(Debug, Default)]
pub(crate) struct GuardState {
    /// Resolved pidfile path, fixed once setup has run.
    pub(crate) path: Option<PathBuf>,

    /// Our own process id, captured at setup.
    pub(crate) pid: Option<u32>,

    /// Open (and possibly locked) pidfile handle.
    pub(crate) handle: Option<File>,

    /// Whether setup has run.
    pub(crate) is_setup: bool,

    /// Whether this guard wrote the current record and must delete it.
    pub(crate) needs_cleanup: bool,
}

impl GuardState {
    /// Close `handle` (or our own handle) and, if `cleanup` applies, delete
    /// the pidfile.
    ///
    /// `cleanup` defaults to `needs_cleanup`. A handle that is already closed
    /// is not an error, and the delete step runs even if closing failed.
    pub(crate) fn close(
        &mut self,
        platform: &dyn Platform,
        handle: Option<File>,
        cleanup: Option<bool>,
    ) -> Result<()> {
        let cleanup = cleanup.unwrap_or(self.needs_cleanup);
        debug!(path = ?self.path, cleanup, "closing pidfile");

        let closed = match handle.or_else(|| self.handle.take()) {
            Some(file) => platform.close_handle(file),
            None => Ok(()),
        };

        let removed = if cleanup { self.remove() } else { Ok(()) };

        closed.map_err(|e| PidFileError::io(format!("failed to close pidfile{}", self.describe()), e))?;
        removed
    }

    fn remove(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if path.is_file() {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PidFileError::io(
                        format!("failed to remove pidfile '{}'", path.display()),
                        e,
                    ));
                }
            }
        }

        // Once we have given the path up, whatever appears there later
        // belongs to someone else.
        self.needs_cleanup = false;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map(|p| format!(" '{}'", p.display()))
            .unwrap_or_default()
    }
}

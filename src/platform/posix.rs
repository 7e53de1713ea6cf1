//! POSIX platform: `kill(pid, 0)` liveness, `flock` locking, `fchmod`/`fchown`.

use super::Platform;
use crate::config::PidFileConfig;
use crate::error::Result;
use fs2::FileExt;
use std::fs::{File, Permissions};
use std::io;
use std::os::unix::fs::{PermissionsExt, fchown};
use std::os::unix::io::IntoRawFd;

/// Signal-probe liveness and `flock(2)` locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

impl Platform for Posix {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn validate_config(&self, _config: &PidFileConfig) -> Result<()> {
        Ok(())
    }

    fn pid_exists(&self, pid: u32) -> io::Result<bool> {
        // 0 and out-of-range ids would address process groups, not a process.
        let pid = match libc::pid_t::try_from(pid) {
            Ok(pid) if pid > 0 => pid,
            _ => return Ok(false),
        };

        // SAFETY: signal 0 performs the permission and existence checks only.
        if unsafe { libc::kill(pid, 0) } == 0 {
            return Ok(true);
        }

        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::ESRCH) => Ok(false),
            _ => Err(err),
        }
    }

    fn try_lock_exclusive(&self, file: &File) -> io::Result<()> {
        FileExt::try_lock_exclusive(file)
    }

    fn apply_ownership(&self, file: &File, config: &PidFileConfig) -> io::Result<()> {
        if let Some(mode) = config.effective_mode() {
            file.set_permissions(Permissions::from_mode(mode))?;
        }
        if config.uid.is_some() || config.gid.is_some() {
            fchown(file, config.uid, config.gid)?;
        }
        Ok(())
    }

    fn close_handle(&self, file: File) -> io::Result<()> {
        let fd = file.into_raw_fd();
        // SAFETY: `fd` came from `into_raw_fd`, so nothing else will close it.
        if unsafe { libc::close(fd) } == 0 {
            return Ok(());
        }

        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EBADF) => Ok(()),
            _ => Err(err),
        }
    }
}

//! Non-POSIX platform: process-table liveness via `sysinfo`, `LockFileEx` locking.
//!
//! There is no chmod/chown and no same-pid allowance here; asking for
//! either is a configuration error rather than something silently ignored.

use super::Platform;
use crate::config::{DEFAULT_MODE, PidFileConfig};
use crate::error::{PidFileError, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// `ERROR_LOCK_VIOLATION`: the region is locked by another handle.
const ERROR_LOCK_VIOLATION: i32 = 33;

/// Process-enumeration liveness and mandatory byte-range locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

impl Platform for Windows {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn validate_config(&self, config: &PidFileConfig) -> Result<()> {
        if config.allow_same_pid {
            return Err(PidFileError::Configuration(
                "allow_same_pid is not supported on non-POSIX systems".to_string(),
            ));
        }
        if let Some(mode) = config.effective_mode()
            && mode != DEFAULT_MODE
        {
            return Err(PidFileError::Configuration(
                "mode is not supported on non-POSIX systems".to_string(),
            ));
        }
        if config.uid.is_some() || config.gid.is_some() {
            return Err(PidFileError::Configuration(
                "uid/gid are not supported on non-POSIX systems".to_string(),
            ));
        }
        Ok(())
    }

    fn pid_exists(&self, pid: u32) -> io::Result<bool> {
        let pid = Pid::from_u32(pid);
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        Ok(system.process(pid).is_some())
    }

    fn try_lock_exclusive(&self, file: &File) -> io::Result<()> {
        FileExt::try_lock_exclusive(file)?;

        // Make sure the lock really is ours by reading through it.
        let mut reader = file;
        reader.seek(SeekFrom::Start(0))?;
        let mut byte = [0u8; 1];
        let _ = reader.read(&mut byte)?;
        Ok(())
    }

    fn apply_ownership(&self, _file: &File, _config: &PidFileConfig) -> io::Result<()> {
        Ok(())
    }

    fn close_handle(&self, file: File) -> io::Result<()> {
        drop(file);
        Ok(())
    }

    fn read_denied_by_lock(&self, err: &io::Error) -> bool {
        err.kind() == io::ErrorKind::PermissionDenied
            || err.raw_os_error() == Some(ERROR_LOCK_VIOLATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_same_pid_allowance() {
        let config = PidFileConfig::default().with_allow_same_pid(true);
        assert!(matches!(
            Windows.validate_config(&config),
            Err(PidFileError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_custom_mode_but_accepts_default() {
        let custom = PidFileConfig::default().with_mode(Some(0o600));
        assert!(Windows.validate_config(&custom).is_err());

        let default = PidFileConfig::default().with_mode(Some(DEFAULT_MODE));
        assert!(Windows.validate_config(&default).is_ok());

        let untouched = PidFileConfig::default().with_mode(Some(0));
        assert!(Windows.validate_config(&untouched).is_ok());
    }

    #[test]
    fn rejects_ownership() {
        let config = PidFileConfig::default().with_owner(Some(1), None);
        assert!(Windows.validate_config(&config).is_err());
    }

    #[test]
    fn lock_violation_counts_as_denied() {
        let err = io::Error::from_raw_os_error(ERROR_LOCK_VIOLATION);
        assert!(Windows.read_denied_by_lock(&err));
        assert!(!Windows.read_denied_by_lock(&io::Error::from(io::ErrorKind::NotFound)));
    }
}

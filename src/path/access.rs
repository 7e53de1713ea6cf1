//! Effective-identity access checks.
//!
//! On POSIX the check uses `faccessat(..., AT_EACCESS)` so a setuid process
//! is judged by its effective ids, not its real ones.

use std::ops::BitOr;
use std::path::Path;

/// Requested access, combinable with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access(u8);

impl Access {
    pub const READ: Access = Access(0b001);
    pub const WRITE: Access = Access(0b010);
    pub const EXECUTE: Access = Access(0b100);

    fn contains(self, other: Access) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Access {
    type Output = Access;

    fn bitor(self, rhs: Access) -> Access {
        Access(self.0 | rhs.0)
    }
}

/// Whether the effective identity has the requested access to `path`.
#[cfg(unix)]
pub fn effective_access(path: &Path, access: Access) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };

    let mut mode = 0;
    if access.contains(Access::READ) {
        mode |= libc::R_OK;
    }
    if access.contains(Access::WRITE) {
        mode |= libc::W_OK;
    }
    if access.contains(Access::EXECUTE) {
        mode |= libc::X_OK;
    }

    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::faccessat(libc::AT_FDCWD, c_path.as_ptr(), mode, libc::AT_EACCESS) == 0 }
}

/// Whether the current user has the requested access to `path`.
///
/// Without POSIX permission bits the best available signal is existence
/// plus the read-only attribute.
#[cfg(not(unix))]
pub fn effective_access(path: &Path, access: Access) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => !(access.contains(Access::WRITE) && meta.permissions().readonly()),
        Err(_) => false,
    }
}

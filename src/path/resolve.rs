//! Pidfile name derivation and directory validation.

use super::access::{Access, effective_access};
use super::defaults::default_pid_dir;
use crate::config::PIDFILE_SUFFIX;
use crate::error::{PidFileError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the running program, as invoked.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .map(PathBuf::from)
        .or_else(|| std::env::current_exe().ok())
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Work out the pidfile's file name.
///
/// Without an explicit name the program name plus `.pid` is used.
pub fn pidfile_name(name: Option<&str>, enforce_suffix: bool) -> String {
    let name = match name {
        Some(name) => name.to_string(),
        None => format!("{}{}", program_name(), PIDFILE_SUFFIX),
    };

    if enforce_suffix && !name.ends_with(PIDFILE_SUFFIX) {
        format!("{}{}", name, PIDFILE_SUFFIX)
    } else {
        name
    }
}

/// Make sure `dir` exists and is usable by the effective identity.
///
/// Creates missing directories (including parents).
pub fn ensure_directory(dir: &Path) -> Result<()> {
    let directory_error = |reason: String| PidFileError::Directory {
        path: dir.to_path_buf(),
        reason,
    };

    if dir.exists() && !dir.is_dir() {
        return Err(directory_error(
            "exists but is not a directory".to_string(),
        ));
    }

    if !dir.is_dir() {
        fs::create_dir_all(dir)
            .map_err(|e| directory_error(format!("cannot be created: {}", e)))?;
    }

    if !effective_access(dir, Access::READ) {
        return Err(directory_error("cannot be read".to_string()));
    }
    if !effective_access(dir, Access::WRITE | Access::EXECUTE) {
        return Err(directory_error("cannot be written to".to_string()));
    }

    Ok(())
}

/// Resolve the absolute pidfile path.
///
/// Directory order: `directory` if given, then the platform runtime
/// directory, then the temp directory. `force_temp_dir` skips straight to
/// the temp directory when no explicit directory is given.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Absolute path to the pidfile
/// * `Err(PidFileError::Directory)` - The directory is not usable
pub fn resolve(
    name: Option<&str>,
    directory: Option<&Path>,
    enforce_suffix: bool,
    force_temp_dir: bool,
) -> Result<PathBuf> {
    let file_name = pidfile_name(name, enforce_suffix);

    let dir = match directory {
        Some(dir) => dir.to_path_buf(),
        None => {
            let default_dir = default_pid_dir();
            if !force_temp_dir && default_dir.is_dir() {
                default_dir.clone()
            } else {
                std::env::temp_dir()
            }
        }
    };

    ensure_directory(&dir)?;

    std::path::absolute(dir.join(file_name)).map_err(|e| PidFileError::Directory {
        path: dir.clone(),
        reason: format!("cannot be made absolute: {}", e),
    })
}

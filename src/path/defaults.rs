//! Platform default pidfile directory.

use super::access::{Access, effective_access};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Candidate runtime directories, most specific first.
#[cfg(unix)]
pub fn runtime_dir_candidates() -> Vec<PathBuf> {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    vec![
        PathBuf::from(format!("/run/user/{}/", uid)),
        PathBuf::from(format!("/var/run/user/{}/", uid)),
        PathBuf::from("/run/"),
        PathBuf::from("/var/run/"),
    ]
}

/// Candidate runtime directories, most specific first.
#[cfg(not(unix))]
pub fn runtime_dir_candidates() -> Vec<PathBuf> {
    match std::env::var_os("APPDATA") {
        Some(appdata) => vec![PathBuf::from(appdata)],
        None => std::env::var_os("USERPROFILE")
            .map(|home| vec![PathBuf::from(home).join("AppData").join("Roaming")])
            .unwrap_or_default(),
    }
}

/// First candidate the effective identity can write into, else the temp dir.
pub fn select_runtime_dir(candidates: &[PathBuf]) -> PathBuf {
    candidates
        .iter()
        .find(|candidate| {
            std::fs::canonicalize(candidate)
                .map(|real| effective_access(&real, Access::WRITE | Access::EXECUTE))
                .unwrap_or(false)
        })
        .cloned()
        .unwrap_or_else(std::env::temp_dir)
}

/// The default pidfile directory, determined once per process.
pub fn default_pid_dir() -> &'static PathBuf {
    static DEFAULT_DIR: OnceLock<PathBuf> = OnceLock::new();
    DEFAULT_DIR.get_or_init(|| select_runtime_dir(&runtime_dir_candidates()))
}

//! Tests for pidfile path resolution.

use super::*;
use crate::error::PidFileError;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_name_gets_suffix() {
    assert_eq!(pidfile_name(Some("worker"), true), "worker.pid");
}

#[test]
fn test_suffix_not_doubled() {
    assert_eq!(pidfile_name(Some("worker.pid"), true), "worker.pid");
}

#[test]
fn test_suffix_not_enforced() {
    assert_eq!(pidfile_name(Some("worker"), false), "worker");
    assert_eq!(pidfile_name(Some("worker.lock"), false), "worker.lock");
}

#[test]
fn test_default_name_from_program() {
    let name = pidfile_name(None, false);
    assert!(name.ends_with(".pid"));
    assert!(name.len() > ".pid".len());
}

#[test]
fn test_resolve_explicit_directory() {
    let temp_dir = TempDir::new().unwrap();

    let path = resolve(Some("alpha"), Some(temp_dir.path()), true, false).unwrap();

    assert!(path.is_absolute());
    assert_eq!(path, temp_dir.path().join("alpha.pid"));
}

#[test]
fn test_resolve_creates_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("a").join("b");

    let path = resolve(Some("beta"), Some(&nested), true, false).unwrap();

    assert!(nested.is_dir());
    assert_eq!(path.parent(), Some(nested.as_path()));
}

#[test]
fn test_resolve_is_reentrant() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("pids");

    let first = resolve(Some("gamma"), Some(&dir), true, false).unwrap();
    let second = resolve(Some("gamma"), Some(&dir), true, false).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_resolve_rejects_file_as_directory() {
    let temp_dir = TempDir::new().unwrap();
    let not_a_dir = temp_dir.path().join("file");
    std::fs::write(&not_a_dir, "x").unwrap();

    let err = resolve(Some("delta"), Some(&not_a_dir), true, false).unwrap_err();

    match err {
        PidFileError::Directory { path, reason } => {
            assert_eq!(path, not_a_dir);
            assert!(reason.contains("not a directory"));
        }
        other => panic!("expected Directory error, got {:?}", other),
    }
}

#[test]
fn test_resolve_uncreatable_directory() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let err = resolve(Some("eps"), Some(&blocker.join("child")), true, false).unwrap_err();

    assert!(matches!(err, PidFileError::Directory { .. }));
    assert!(err.to_string().contains("cannot be created"));
}

#[cfg(unix)]
#[test]
fn test_resolve_unwritable_directory() {
    use std::os::unix::fs::PermissionsExt;

    // Root bypasses permission bits.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let locked = temp_dir.path().join("ro");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o500)).unwrap();

    let err = resolve(Some("zeta"), Some(&locked), true, false).unwrap_err();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o700)).unwrap();

    assert!(err.to_string().contains("cannot be written to"));
}

#[test]
fn test_force_temp_dir() {
    let path = resolve(Some("pidguard-force-tmp"), None, true, true).unwrap();
    let expected = std::path::absolute(std::env::temp_dir().join("pidguard-force-tmp.pid")).unwrap();
    assert_eq!(path, expected);
}

#[test]
fn test_explicit_directory_wins_over_force_temp_dir() {
    let temp_dir = TempDir::new().unwrap();
    let path = resolve(Some("eta"), Some(temp_dir.path()), true, true).unwrap();
    assert_eq!(path.parent(), Some(temp_dir.path()));
}

#[test]
fn test_select_runtime_dir_prefers_first_usable() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");
    let usable = temp_dir.path().join("usable");
    std::fs::create_dir(&usable).unwrap();

    let selected = select_runtime_dir(&[missing, usable.clone()]);

    assert_eq!(selected, usable);
}

#[test]
fn test_select_runtime_dir_falls_back_to_temp() {
    let selected = select_runtime_dir(&[PathBuf::from("/nonexistent/pidguard/run")]);
    assert_eq!(selected, std::env::temp_dir());
}

#[test]
fn test_default_pid_dir_is_stable() {
    assert_eq!(default_pid_dir(), default_pid_dir());
    assert!(!runtime_dir_candidates().is_empty() || cfg!(not(unix)));
}

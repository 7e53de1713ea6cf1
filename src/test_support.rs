use crate::config::{PidFileConfig, SignalPolicy};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Config for a pidfile in `dir` that leaves process-global state alone.
///
/// SIGTERM handling and exit hooks are process-wide; tests that exercise
/// them opt back in and run `#[serial]`.
pub(crate) fn test_config(dir: &Path, name: &str) -> PidFileConfig {
    PidFileConfig::named(name)
        .with_directory(dir)
        .with_term_signal(SignalPolicy::Disabled)
        .with_exit_hook(false)
}

/// Write raw content where `test_config(dir, name)` would put the pidfile.
pub(crate) fn write_pidfile(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("{}.pid", name));
    std::fs::write(&path, content).unwrap();
    path
}

/// Pid of a child that has already exited and been reaped.
pub(crate) fn dead_pid() -> u32 {
    let mut child = if cfg!(windows) {
        Command::new("cmd").args(["/C", "exit 0"]).spawn()
    } else {
        Command::new("true").spawn()
    }
    .unwrap_or_else(|e| panic!("failed to spawn short-lived child: {}", e));

    let pid = child.id();
    let status = child.wait().unwrap();
    assert!(status.success());
    pid
}

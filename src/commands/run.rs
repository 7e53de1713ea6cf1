//! Implementation of the `pidguard run` command.
//!
//! Takes the pidfile, runs the given command to completion, and releases
//! the pidfile. The child's exit status becomes ours.

use crate::cli::RunArgs;
use anyhow::{Context, Result};
use pidguard::{PidFileGuard, exit_codes};
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Execute the `pidguard run` command.
pub fn cmd_run(args: RunArgs) -> Result<i32> {
    let (program, program_args) = args
        .command
        .split_first()
        .context("no command given to run")?;

    let guard = PidFileGuard::acquire(args.pidfile.to_config()?)?;
    debug!(path = ?guard.path(), program = %program, "holding pidfile");

    let status = Command::new(program)
        .args(program_args)
        .status()
        .with_context(|| format!("failed to run '{}'", program));

    guard.release()?;
    Ok(exit_code(status?))
}

/// Map a child's exit status onto a process exit code.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    exit_codes::IO_FAILURE
}

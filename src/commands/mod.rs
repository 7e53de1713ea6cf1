//! Command implementations for pidguard.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command returns the process exit code to use.

mod check;
mod run;

use crate::cli::{Command, PidFileArgs};
use anyhow::Result;
use pidguard::{PidFile, exit_codes};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Path(args) => cmd_path(args),
        Command::Check(args) => check::cmd_check(args),
        Command::Run(args) => run::cmd_run(args),
    }
}

/// Execute the `pidguard path` command.
fn cmd_path(args: PidFileArgs) -> Result<i32> {
    let mut pidfile = PidFile::new(args.to_config()?)?;
    pidfile.setup()?;

    if let Some(path) = pidfile.path() {
        println!("{}", path.display());
    }
    Ok(exit_codes::SUCCESS)
}

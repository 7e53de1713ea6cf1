//! Implementation of the `pidguard check` command.
//!
//! Inspects the pidfile without creating it and reports one of:
//! - `no_file`, `empty`, `not_running`, `same_pid` (exit 0)
//! - `already_running` with the owner's pid (exit 4)

use crate::cli::CheckArgs;
use anyhow::Result;
use pidguard::{PidFile, PidFileError, exit_codes};
use serde::Serialize;
use std::path::PathBuf;

/// What `check` found, in a shape that serializes cleanly.
#[derive(Debug, Serialize)]
struct CheckReport {
    path: Option<PathBuf>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
}

/// Execute the `pidguard check` command.
pub fn cmd_check(args: CheckArgs) -> Result<i32> {
    let mut pidfile = PidFile::new(args.pidfile.to_config()?)?;

    let (report, code) = match pidfile.check() {
        Ok(outcome) => (build_report(&pidfile, outcome.as_str(), None), exit_codes::SUCCESS),
        Err(err @ PidFileError::AlreadyRunning { .. }) => (
            build_report(&pidfile, "already_running", err.pid()),
            err.exit_code(),
        ),
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print_report(&report);
    }

    Ok(code)
}

fn build_report(pidfile: &PidFile, status: &'static str, pid: Option<u32>) -> CheckReport {
    CheckReport {
        path: pidfile.path(),
        status,
        pid,
    }
}

fn print_report(report: &CheckReport) {
    let path = report
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    match report.pid {
        Some(pid) => println!("{}: {} (pid {})", path, report.status, pid),
        None => println!("{}: {}", path, report.status),
    }
}

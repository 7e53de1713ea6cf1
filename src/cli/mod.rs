//! CLI argument parsing for pidguard.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use pidguard::{PidFileConfig, PidFileError, SignalPolicy};
use std::path::PathBuf;

/// pidguard: run a program as a single instance, guarded by a pidfile.
///
/// The pidfile holds the owner's pid and an exclusive advisory lock while
/// the owner lives, and is removed when it exits.
#[derive(Parser, Debug)]
#[command(name = "pidguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug output to stderr (overrides PIDGUARD_LOG).
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for pidguard.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved pidfile path.
    Path(PidFileArgs),

    /// Report whether another instance holds the pidfile.
    ///
    /// Exits 0 when no live owner is recorded, non-zero otherwise.
    Check(CheckArgs),

    /// Hold the pidfile while running a command.
    ///
    /// Fails without running the command if another instance holds it.
    Run(RunArgs),
}

/// Pidfile options shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct PidFileArgs {
    /// Load base configuration from a YAML file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pidfile name (default: program name).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory for the pidfile (default: runtime directory).
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Do not append `.pid` to the name.
    #[arg(long)]
    pub no_suffix: bool,

    /// Use the system temp directory instead of the runtime directory.
    #[arg(long)]
    pub force_tmpdir: bool,

    /// Do not take the advisory lock; rely on the recorded pid only.
    #[arg(long)]
    pub no_lock: bool,

    /// Treat a record holding our own pid as non-conflicting.
    #[arg(long)]
    pub allow_samepid: bool,

    /// SIGTERM handling: disabled, enabled or auto.
    #[arg(long, value_parser = parse_signal_policy)]
    pub term_signal: Option<SignalPolicy>,

    /// Permission bits for the pidfile, in octal (e.g. 600).
    #[arg(long, value_parser = parse_octal_mode)]
    pub mode: Option<u32>,

    /// Owner uid for the pidfile.
    #[arg(long)]
    pub uid: Option<u32>,

    /// Owner gid for the pidfile.
    #[arg(long)]
    pub gid: Option<u32>,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub pidfile: PidFileArgs,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub pidfile: PidFileArgs,

    /// Command to run, followed by its arguments.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

fn parse_signal_policy(s: &str) -> Result<SignalPolicy, String> {
    SignalPolicy::from_str(s).ok_or_else(|| {
        format!(
            "invalid signal policy '{}': expected disabled, enabled or auto",
            s
        )
    })
}

fn parse_octal_mode(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0o");
    u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode '{}': {}", s, e))
}

impl PidFileArgs {
    /// Build the pidfile configuration: the YAML file (if any) with flags on top.
    pub fn to_config(&self) -> Result<PidFileConfig, PidFileError> {
        let mut config = match &self.config {
            Some(path) => PidFileConfig::load(path)?,
            None => PidFileConfig::default(),
        };

        if let Some(name) = &self.name {
            config.name = Some(name.clone());
        }
        if let Some(dir) = &self.dir {
            config.directory = Some(dir.clone());
        }
        if self.no_suffix {
            config.enforce_suffix = false;
        }
        if self.force_tmpdir {
            config.force_temp_dir = true;
        }
        if self.no_lock {
            config.lock = false;
        }
        if self.allow_samepid {
            config.allow_same_pid = true;
        }
        if let Some(policy) = self.term_signal {
            config.term_signal = policy;
        }
        if self.mode.is_some() {
            config.mode = self.mode;
        }
        if self.uid.is_some() {
            config.uid = self.uid;
        }
        if self.gid.is_some() {
            config.gid = self.gid;
        }

        config.validate()?;
        Ok(config)
    }
}

//! The pidfile lifecycle: setup, check, create, close.

use super::state::GuardState;
use crate::config::PidFileConfig;
use crate::error::{PidFileError, Result, UnreadableCause};
use crate::exit_hook;
use crate::path;
use crate::platform::{self, Platform};
use crate::record::{self, Record};
use crate::signals;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Non-error outcomes of [`PidFile::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PidCheck {
    /// The pidfile exists but holds no pid.
    Empty,
    /// There is no pidfile.
    NoFile,
    /// The pidfile holds our own pid and same-pid allowance is on.
    SamePid,
    /// The pidfile names a process that is no longer running.
    NotRunning,
}

impl PidCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            PidCheck::Empty => "empty",
            PidCheck::NoFile => "no_file",
            PidCheck::SamePid => "same_pid",
            PidCheck::NotRunning => "not_running",
        }
    }
}

/// A single-instance guard backed by a pidfile.
///
/// Construction does no I/O. The path is resolved and the SIGTERM policy
/// applied on first use (`setup`), `create` takes the lock and writes our
/// pid, and `close` releases the handle and removes the file if we wrote it.
/// `close` is idempotent, and dropping a `PidFile` closes it.
///
/// Calling `create` again after `close` re-opens the pidfile; setup is not
/// repeated, so the path and SIGTERM policy stay as they were.
///
/// # Example
///
/// ```no_run
/// use pidguard::{PidFile, PidFileConfig};
///
/// let mut pidfile = PidFile::new(PidFileConfig::named("worker"))?;
/// pidfile.create()?;
/// // ... do the work only one instance may do ...
/// pidfile.close()?;
/// # Ok::<(), pidguard::PidFileError>(())
/// ```
pub struct PidFile {
    config: PidFileConfig,
    platform: &'static dyn Platform,
    state: Arc<Mutex<GuardState>>,
}

impl std::fmt::Debug for PidFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PidFile")
            .field("config", &self.config)
            .field("platform", &self.platform.name())
            .field("state", &self.state)
            .finish()
    }
}

pub(crate) fn lock_state(state: &Mutex<GuardState>) -> MutexGuard<'_, GuardState> {
    state.lock().unwrap_or_else(|poison| poison.into_inner())
}

impl PidFile {
    /// Create a guard for the native platform.
    ///
    /// # Returns
    ///
    /// * `Ok(PidFile)` - Guard ready for `setup`/`check`/`create`
    /// * `Err(PidFileError::Configuration)` - Invalid or unsupported configuration
    pub fn new(config: PidFileConfig) -> Result<Self> {
        Self::with_platform(config, platform::native())
    }

    /// Create a guard backed by a specific platform implementation.
    pub fn with_platform(config: PidFileConfig, platform: &'static dyn Platform) -> Result<Self> {
        config.validate()?;
        platform.validate_config(&config)?;

        Ok(Self {
            config,
            platform,
            state: Arc::new(Mutex::new(GuardState::default())),
        })
    }

    fn state(&self) -> MutexGuard<'_, GuardState> {
        lock_state(&self.state)
    }

    pub fn config(&self) -> &PidFileConfig {
        &self.config
    }

    /// The resolved pidfile path, once setup has run.
    pub fn path(&self) -> Option<PathBuf> {
        self.state().path.clone()
    }

    /// Our own pid, once setup has run.
    pub fn pid(&self) -> Option<u32> {
        self.state().pid
    }

    pub fn is_setup(&self) -> bool {
        self.state().is_setup
    }

    /// Whether this guard currently holds an open pidfile handle.
    pub fn is_open(&self) -> bool {
        self.state().handle.is_some()
    }

    /// Raw descriptor of the open pidfile handle.
    #[cfg(unix)]
    pub fn as_raw_fd(&self) -> Option<std::os::unix::io::RawFd> {
        use std::os::unix::io::AsRawFd;
        self.state().handle.as_ref().map(|f| f.as_raw_fd())
    }

    /// Resolve the path and apply the SIGTERM policy. Runs at most once.
    pub fn setup(&mut self) -> Result<()> {
        let config = &self.config;
        lock_state(&self.state).setup(config).map(|_| ())
    }

    /// Inspect the pidfile without taking ownership of it.
    ///
    /// # Returns
    ///
    /// * `Ok(PidCheck)` - No conflicting instance was found
    /// * `Err(PidFileError::AlreadyRunning)` - The record names a live process
    /// * `Err(PidFileError::Unreadable)` - The record is corrupt or unreadable
    pub fn check(&mut self) -> Result<PidCheck> {
        let (config, platform) = (&self.config, self.platform);
        lock_state(&self.state).check(config, platform)
    }

    /// Lock the pidfile, make sure no other instance owns it, and write our pid.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - This process now owns the pidfile
    /// * `Err(PidFileError::AlreadyLocked)` - Another handle holds the lock
    /// * `Err(PidFileError::AlreadyRunning)` - The record names a live process
    /// * `Err(PidFileError::Unreadable)` - The existing record is corrupt
    pub fn create(&mut self) -> Result<()> {
        let (config, platform) = (&self.config, self.platform);
        lock_state(&self.state).create(config, platform)?;

        if config.register_exit_hook {
            exit_hook::register(&self.state, platform);
        }
        Ok(())
    }

    /// Release the handle and remove the pidfile if this guard wrote it.
    pub fn close(&mut self) -> Result<()> {
        self.close_with(None, None)
    }

    /// Close `handle` (default: our own) with an explicit cleanup decision
    /// (default: whether this guard wrote the record).
    pub fn close_with(&mut self, handle: Option<File>, cleanup: Option<bool>) -> Result<()> {
        let platform = self.platform;
        lock_state(&self.state).close(platform, handle, cleanup)
    }

    /// Turn this pidfile into a scoped guard by creating it.
    pub fn guard(self) -> Result<super::PidFileGuard> {
        super::PidFileGuard::from_pidfile(self)
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        if state.handle.is_none() && !state.needs_cleanup {
            return;
        }
        if let Err(e) = state.close(self.platform, None, None) {
            warn!(path = ?state.path, error = %e, "failed to release pidfile");
        }
    }
}

impl GuardState {
    fn setup(&mut self, config: &PidFileConfig) -> Result<PathBuf> {
        if !self.is_setup {
            debug!(name = ?config.name, directory = ?config.directory, "setting up pidfile");
            if self.path.is_none() {
                self.pid = Some(std::process::id());
                self.path = Some(path::resolve(
                    config.name.as_deref(),
                    config.directory.as_deref(),
                    config.enforce_suffix,
                    config.force_temp_dir,
                )?);
                signals::apply(config.term_signal)?;
            }
            self.is_setup = true;
        }

        self.path
            .clone()
            .ok_or_else(|| PidFileError::Configuration("pidfile path was not resolved".to_string()))
    }

    fn check(&mut self, config: &PidFileConfig, platform: &dyn Platform) -> Result<PidCheck> {
        let path = self.setup(config)?;
        debug!(path = %path.display(), "checking pidfile");

        if let Some(mut file) = self.handle.take() {
            return match self.inspect(&path, &mut file, config, platform) {
                Ok(outcome) => {
                    self.handle = Some(file);
                    Ok(outcome)
                }
                Err(err) => Err(self.close_after_failure(platform, file, err)),
            };
        }

        if !path.is_file() {
            return Ok(PidCheck::NoFile);
        }

        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PidCheck::NoFile),
            Err(e) if platform.read_denied_by_lock(&e) => {
                return Err(PidFileError::probe_failed(None, e));
            }
            Err(e) => {
                return Err(PidFileError::Unreadable {
                    path,
                    source: UnreadableCause::Io(e),
                });
            }
        };

        match self.inspect(&path, &mut file, config, platform) {
            Ok(outcome) => {
                self.close(platform, Some(file), Some(false))?;
                Ok(outcome)
            }
            Err(err) => Err(self.close_after_failure(platform, file, err)),
        }
    }

    /// Read the record through `file` and decide whether it conflicts.
    pub(super) fn inspect(
        &self,
        path: &Path,
        file: &mut File,
        config: &PidFileConfig,
        platform: &dyn Platform,
    ) -> Result<PidCheck> {
        let pid = match record::read_from(file) {
            Ok(Record::Empty) => return Ok(PidCheck::Empty),
            Ok(Record::Pid(pid)) => pid,
            // A locked file that cannot be read is held by a live owner.
            Err(UnreadableCause::Io(e)) if platform.read_denied_by_lock(&e) => {
                return Err(PidFileError::probe_failed(None, e));
            }
            Err(source) => {
                return Err(PidFileError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if config.allow_same_pid && self.pid == Some(pid) {
            return Ok(PidCheck::SamePid);
        }

        match platform.pid_exists(pid) {
            Ok(true) => Err(PidFileError::already_running(pid)),
            Ok(false) => Ok(PidCheck::NotRunning),
            Err(e) => Err(PidFileError::probe_failed(Some(pid), e)),
        }
    }

    fn create(&mut self, config: &PidFileConfig, platform: &dyn Platform) -> Result<()> {
        let path = self.setup(config)?;
        debug!(path = %path.display(), "creating pidfile");

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                PidFileError::io(format!("failed to open pidfile '{}'", path.display()), e)
            })?;

        if config.lock
            && let Err(source) = platform.try_lock_exclusive(&file)
        {
            if let Err(e) = self.close(platform, Some(file), Some(false)) {
                warn!(path = %path.display(), error = %e, "failed to close pidfile handle");
            }
            if config.allow_same_pid {
                debug!(path = %path.display(), "pidfile already locked, same pid allowed");
                return Ok(());
            }
            return Err(PidFileError::AlreadyLocked { path, source });
        }

        let outcome = match self.inspect(&path, &mut file, config, platform) {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.close_after_failure(platform, file, err)),
        };

        if outcome == PidCheck::SamePid {
            self.handle = Some(file);
            return Ok(());
        }

        if let Err(err) = self.write_record(&path, &mut file, config, platform) {
            return Err(self.close_after_failure(platform, file, err));
        }

        if outcome == PidCheck::NotRunning {
            info!(path = %path.display(), "replaced stale pidfile");
        }

        self.handle = Some(file);
        self.needs_cleanup = true;
        Ok(())
    }

    fn write_record(
        &self,
        path: &Path,
        file: &mut File,
        config: &PidFileConfig,
        platform: &dyn Platform,
    ) -> Result<()> {
        let pid = self.pid.unwrap_or_else(std::process::id);
        let write_error =
            |e: io::Error| PidFileError::io(format!("failed to write pidfile '{}'", path.display()), e);

        platform.apply_ownership(file, config).map_err(|e| {
            PidFileError::io(
                format!("failed to set pidfile ownership on '{}'", path.display()),
                e,
            )
        })?;

        file.set_len(0).map_err(write_error)?;
        file.seek(SeekFrom::Start(0)).map_err(write_error)?;
        file.write_all(record::encode(pid).as_bytes())
            .map_err(write_error)?;
        file.flush().map_err(write_error)?;
        file.seek(SeekFrom::Start(0)).map_err(write_error)?;

        debug!(path = %path.display(), pid, "wrote pidfile");
        Ok(())
    }

    /// Close `file` after a failed check, returning the original error.
    ///
    /// Only an unreadable record may be cleaned up, and only if we own it.
    fn close_after_failure(
        &mut self,
        platform: &dyn Platform,
        file: File,
        err: PidFileError,
    ) -> PidFileError {
        let cleanup = matches!(err, PidFileError::Unreadable { .. }) && self.needs_cleanup;
        if let Err(close_err) = self.close(platform, Some(file), Some(cleanup)) {
            warn!(path = ?self.path, error = %close_err, "failed to close pidfile handle");
        }
        err
    }
}

//! SIGTERM registration.
//!
//! Installing a signal handler changes process-wide state: there is exactly
//! one SIGTERM disposition per process, shared by every pidfile and every
//! other library in it. Setup applies the configured [`SignalPolicy`] once
//! per `PidFile`; `Auto` inspects the current disposition first and never
//! replaces a handler somebody else installed.
//!
//! The default handler calls `exit`, so exit hooks (and with them pidfile
//! cleanup) run when the process is asked to terminate.
//!
//! That cleanup is not async-signal-safe: it runs from the handler, removes
//! the file through `std::fs` (which allocates) and emits `tracing` events.
//! A SIGTERM that lands while the interrupted thread holds the allocator or
//! a subscriber lock can deadlock or abort instead of exiting cleanly.

use crate::config::SignalPolicy;
use crate::error::{PidFileError, Result};
use std::io;
use tracing::debug;

/// Exit status used by the default handler (128 + SIGTERM).
pub const TERM_EXIT_STATUS: libc::c_int = 128 + libc::SIGTERM;

extern "C" fn exit_on_term(_sig: libc::c_int) {
    // SAFETY: `exit` runs the registered exit hooks and never returns.
    unsafe { libc::exit(TERM_EXIT_STATUS) }
}

/// Address of the default handler, as stored in the signal table.
pub fn default_handler() -> libc::sighandler_t {
    exit_on_term as extern "C" fn(libc::c_int) as libc::sighandler_t
}

/// Apply `policy` to the process SIGTERM disposition.
pub fn apply(policy: SignalPolicy) -> Result<()> {
    let applied = match policy {
        SignalPolicy::Disabled => return Ok(()),
        SignalPolicy::Enabled => install(default_handler()),
        SignalPolicy::Auto => install_if_default(default_handler()),
        SignalPolicy::Custom(handler) => {
            install(handler as extern "C" fn(libc::c_int) as libc::sighandler_t)
        }
    };

    applied.map_err(|e| PidFileError::io("failed to register SIGTERM handler", e))?;
    debug!(policy = policy.as_str(), "applied SIGTERM policy");
    Ok(())
}

#[cfg(unix)]
fn current() -> io::Result<libc::sighandler_t> {
    // SAFETY: a zeroed sigaction is a valid out-parameter; a null `act`
    // only queries the disposition.
    unsafe {
        let mut old: libc::sigaction = std::mem::zeroed();
        if libc::sigaction(libc::SIGTERM, std::ptr::null(), &mut old) != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(old.sa_sigaction)
    }
}

#[cfg(unix)]
fn install(handler: libc::sighandler_t) -> io::Result<()> {
    if current()? == handler {
        return Ok(());
    }

    // SAFETY: `action` is fully initialised before being handed to sigaction.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(libc::SIGTERM, &action, std::ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(unix)]
fn install_if_default(handler: libc::sighandler_t) -> io::Result<()> {
    if current()? == libc::SIG_DFL {
        install(handler)
    } else {
        debug!("SIGTERM already has a handler, leaving it in place");
        Ok(())
    }
}

#[cfg(not(unix))]
fn install(handler: libc::sighandler_t) -> io::Result<()> {
    // SAFETY: `signal` swaps the CRT disposition; the previous one is discarded.
    unsafe { libc::signal(libc::SIGTERM, handler) };
    Ok(())
}

#[cfg(not(unix))]
fn install_if_default(handler: libc::sighandler_t) -> io::Result<()> {
    // The CRT has no query call: swap in, and put back anything non-default.
    // SAFETY: see `install`.
    let previous = unsafe { libc::signal(libc::SIGTERM, handler) };
    if previous != libc::SIG_DFL && previous != handler {
        unsafe { libc::signal(libc::SIGTERM, previous) };
        debug!("SIGTERM already has a handler, leaving it in place");
    }
    Ok(())
}

/// The handler currently installed for SIGTERM.
#[cfg(unix)]
pub fn current_handler() -> Result<libc::sighandler_t> {
    current().map_err(|e| PidFileError::io("failed to query SIGTERM handler", e))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serial_test::serial;

    extern "C" fn custom(_sig: libc::c_int) {}

    fn custom_addr() -> libc::sighandler_t {
        custom as extern "C" fn(libc::c_int) as libc::sighandler_t
    }

    fn reset() {
        unsafe { libc::signal(libc::SIGTERM, libc::SIG_DFL) };
    }

    #[test]
    #[serial]
    fn disabled_leaves_disposition_alone() {
        reset();
        apply(SignalPolicy::Disabled).unwrap();
        assert_eq!(current_handler().unwrap(), libc::SIG_DFL);
    }

    #[test]
    #[serial]
    fn enabled_installs_default_handler() {
        reset();
        apply(SignalPolicy::Enabled).unwrap();
        assert_eq!(current_handler().unwrap(), default_handler());
        reset();
    }

    #[test]
    #[serial]
    fn enabled_is_idempotent() {
        reset();
        apply(SignalPolicy::Enabled).unwrap();
        apply(SignalPolicy::Enabled).unwrap();
        assert_eq!(current_handler().unwrap(), default_handler());
        reset();
    }

    #[test]
    #[serial]
    fn auto_installs_over_default_disposition() {
        reset();
        apply(SignalPolicy::Auto).unwrap();
        assert_eq!(current_handler().unwrap(), default_handler());
        reset();
    }

    #[test]
    #[serial]
    fn auto_keeps_existing_custom_handler() {
        reset();
        apply(SignalPolicy::Custom(custom)).unwrap();
        apply(SignalPolicy::Auto).unwrap();
        assert_eq!(current_handler().unwrap(), custom_addr());
        reset();
    }

    #[test]
    #[serial]
    fn custom_replaces_anything() {
        reset();
        apply(SignalPolicy::Enabled).unwrap();
        apply(SignalPolicy::Custom(custom)).unwrap();
        assert_eq!(current_handler().unwrap(), custom_addr());
        reset();
    }
}

//! Process exit cleanup.
//!
//! `create` registers each pidfile here when `register_exit_hook` is on. A
//! single C runtime `atexit` callback closes every registered pidfile that
//! is still alive, so cleanup happens on `exit` (including the one issued
//! by the SIGTERM handler) even when no destructor gets to run.
//!
//! The registry only holds weak references: a dropped `PidFile` has already
//! closed itself and is skipped.

use crate::pidfile::GuardState;
use crate::platform::Platform;
use std::sync::{Arc, Mutex, Once, TryLockError, Weak};
use tracing::debug;

struct Entry {
    state: Weak<Mutex<GuardState>>,
    platform: &'static dyn Platform,
}

static REGISTRY: Mutex<Vec<Entry>> = Mutex::new(Vec::new());
static INSTALL: Once = Once::new();

#[cfg(not(unix))]
unsafe extern "C" {
    fn atexit(cb: extern "C" fn()) -> libc::c_int;
}

extern "C" fn on_exit() {
    run();
}

fn install() {
    INSTALL.call_once(|| {
        #[cfg(unix)]
        // SAFETY: `on_exit` is a plain function that never unwinds.
        let rc = unsafe { libc::atexit(on_exit) };
        #[cfg(not(unix))]
        // SAFETY: as above.
        let rc = unsafe { atexit(on_exit) };

        if rc != 0 {
            debug!("failed to install exit hook");
        }
    });
}

/// Close `state` when the process exits.
pub(crate) fn register(state: &Arc<Mutex<GuardState>>, platform: &'static dyn Platform) {
    install();

    let weak = Arc::downgrade(state);
    let mut registry = REGISTRY.lock().unwrap_or_else(|poison| poison.into_inner());
    registry.retain(|entry| entry.state.strong_count() > 0);
    if !registry.iter().any(|entry| entry.state.ptr_eq(&weak)) {
        registry.push(Entry {
            state: weak,
            platform,
        });
    }
}

/// Close every registered pidfile that is still alive.
///
/// Locks are only tried, never waited on: this may run from a signal
/// handler that interrupted a thread holding one of them.
pub(crate) fn run() {
    let entries = match REGISTRY.try_lock() {
        Ok(mut registry) => std::mem::take(&mut *registry),
        Err(TryLockError::Poisoned(poison)) => std::mem::take(&mut *poison.into_inner()),
        Err(TryLockError::WouldBlock) => return,
    };

    for entry in entries {
        let Some(state) = entry.state.upgrade() else {
            continue;
        };
        let mut guard = match state.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poison)) => poison.into_inner(),
            Err(TryLockError::WouldBlock) => continue,
        };
        let _ = guard.close(entry.platform, None, None);
    }
}

/// Number of live registered pidfiles.
#[cfg(test)]
pub(crate) fn registered() -> usize {
    let registry = lock_registry();
    registry
        .iter()
        .filter(|entry| entry.state.strong_count() > 0)
        .count()
}

#[cfg(test)]
fn lock_registry() -> std::sync::MutexGuard<'static, Vec<Entry>> {
    REGISTRY.lock().unwrap_or_else(|poison| poison.into_inner())
}

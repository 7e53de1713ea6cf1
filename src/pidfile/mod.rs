//! Single-instance pidfile guard.
//!
//! This module implements the pidfile lifecycle:
//! - `setup`: resolve the path and apply the SIGTERM policy (once)
//! - `check`: read the record and decide whether another instance is alive
//! - `create`: take the advisory lock, check, and write our pid
//! - `close`: release the handle and remove the file if we wrote it
//!
//! # Pidfile Format
//!
//! A pidfile holds the owner's pid in decimal followed by a newline.
//!
//! # Three Signals
//!
//! Whether another instance is running is decided from the exclusive
//! advisory lock, the liveness of the recorded pid, and (with same-pid
//! allowance) whether the recorded pid is our own. The lock is always
//! taken before the record is read or written.
//!
//! # RAII Guards
//!
//! `PidFileGuard` creates on construction and closes on drop. Dropping a
//! `PidFile` also closes it, and `create` can register the close with the
//! process exit hooks so that `exit` (including via SIGTERM) cleans up.

mod guard;
mod lifecycle;
mod state;


// Re-export public API
pub use guard::{PidFileGuard, with_pidfile};
pub use lifecycle::{PidCheck, PidFile};

pub(crate) use state::GuardState;

//! Exit code constants for the pidguard CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid configuration)
//! - 2: Pidfile directory unusable
//! - 3: Pidfile locked by another process
//! - 4: Another instance is running
//! - 5: Pidfile record unreadable
//! - 6: Other I/O failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an unsupported configuration.
pub const USER_ERROR: i32 = 1;

/// The pidfile directory is missing, not a directory, or not accessible.
pub const DIRECTORY_ERROR: i32 = 2;

/// The pidfile's advisory lock is held by another process.
pub const ALREADY_LOCKED: i32 = 3;

/// The pidfile names another live process.
pub const ALREADY_RUNNING: i32 = 4;

/// The pidfile content could not be read or parsed.
pub const UNREADABLE: i32 = 5;

/// Unexpected filesystem failure.
pub const IO_FAILURE: i32 = 6;

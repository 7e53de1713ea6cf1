//! Pidfile path resolution.
//!
//! Turns a name, a directory hint and a suffix policy into an absolute
//! pidfile path, creating and validating the containing directory on the way.

mod access;
mod defaults;
mod resolve;

#[cfg(test)]
mod tests;

// Re-export public API
pub use access::{Access, effective_access};
pub use defaults::{default_pid_dir, runtime_dir_candidates, select_runtime_dir};
pub use resolve::{ensure_directory, pidfile_name, resolve};

//! Gateway self-reporting: build info, liveness, and release update checks.

pub mod health;
pub mod update;

pub use health::health_handler;
pub use update::{update_check_handler, UpdateChecker, UpdateError};

/// Version and commit of the running binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
}

impl BuildInfo {
    /// `VOID_COMMIT` is read at compile time; unset or empty means "unknown".
    pub fn current() -> Self {
        let commit = match option_env!("VOID_COMMIT") {
            Some(commit) if !commit.is_empty() => commit,
            _ => "unknown",
        };
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit,
        }
    }
}

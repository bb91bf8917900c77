//! Typed errors for the cases callers need to distinguish
//!
//! Workflow code uses `anyhow` for context-carrying propagation; the variants
//! here exist so the binary can map validation and precondition failures to
//! their conventional exit codes and tests can assert on them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The target directory already exists and `--force` was not given.
    #[error("Application already exists at {}", .0.display())]
    ApplicationAlreadyExists(PathBuf),

    /// `--force` combined with installing into the current directory would
    /// delete the directory the user is standing in.
    #[error("Cannot use --force option when using the current directory for installation")]
    ForceIntoCurrentDirectory,

    /// An option value outside its allowed set.
    #[error("Invalid {option} \"{value}\". Allowed values: {allowed}")]
    InvalidOption {
        option: &'static str,
        value: String,
        allowed: String,
    },

    /// Options that contradict each other.
    #[error("{0}")]
    ConflictingOptions(String),

    #[error("Failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

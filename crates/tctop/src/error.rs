//! Error types for tctop operations.

use std::io;
use std::process::ExitStatus;

/// Result type for tctop operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a report run.
///
/// Blocks of `tc` output that lack required fields are not errors; the
/// parsers skip them and never produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while talking to the collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unknown sort metric.
    #[error("unknown metric '{name}', valid metrics are: {valid}")]
    Configuration {
        /// The rejected metric name.
        name: String,
        /// Comma-separated list of accepted names.
        valid: String,
    },

    /// Invalid row limit.
    #[error("invalid row limit: {0}")]
    InvalidLimit(String),

    /// Invalid reference capacity.
    #[error("invalid capacity: {0}")]
    InvalidCapacity(String),

    /// The two captures were not separated by a positive amount of time.
    #[error("non-positive sampling interval: {elapsed_secs}s between captures")]
    Sampling {
        /// Measured gap between the two captures, in seconds.
        elapsed_secs: f64,
    },

    /// The `tc` program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The `tc` program ran but reported failure.
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        /// Full command line.
        command: String,
        /// Exit status of the process.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The `tc` program produced output that is not UTF-8.
    #[error("`{command}` produced non UTF-8 output")]
    Utf8 {
        /// Full command line.
        command: String,
    },
}

impl Error {
    /// Build a configuration error for an unknown metric name.
    pub fn unknown_metric(name: impl Into<String>, valid: &[&str]) -> Self {
        Self::Configuration {
            name: name.into(),
            valid: valid.join(", "),
        }
    }

    /// Check if this is a "not found" error (missing program or device).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Spawn { source, .. } | Self::Io(source) => {
                source.kind() == io::ErrorKind::NotFound
            }
            Self::CommandFailed { stderr, .. } => {
                stderr.contains("Cannot find device") || stderr.contains("No such device")
            }
            _ => false,
        }
    }

    /// Check if this is a permission error.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Spawn { source, .. } | Self::Io(source) => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            Self::CommandFailed { stderr, .. } => {
                stderr.contains("Operation not permitted") || stderr.contains("Permission denied")
            }
            _ => false,
        }
    }
}

// ============================================================================
// ffwrap-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Pipeline Runner
//
// This module defines the error type shared by every stage of the pipeline
// runner. Soft failures (missing or unprobeable input) are NOT errors; they
// are reported through `ProbeResult` and handled by the recovery policy.
// `CoreError` covers everything that must stop an invocation.
//
// KEY COMPONENTS:
// - CoreError: the error enum
// - CoreResult: result alias used throughout the crate
// - Constructor helpers for subprocess errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving, preparing or executing a wrapper invocation.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    /// The external tool could not be started at all (missing binary,
    /// permission denied, ...).
    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed while waiting for '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Invalid config file '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid value for '{name}': {message}")]
    InvalidSetting { name: &'static str, message: String },

    #[error("{0}")]
    OperationFailed(String),
}

/// Result alias for operations in this crate.
pub type CoreResult<T> = Result<T, CoreError>;

pub fn command_start_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

pub fn command_wait_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

pub fn config_error(path: impl Into<PathBuf>, message: impl Into<String>) -> CoreError {
    CoreError::Config {
        path: path.into(),
        message: message.into(),
    }
}

pub fn invalid_setting(name: &'static str, message: impl Into<String>) -> CoreError {
    CoreError::InvalidSetting {
        name,
        message: message.into(),
    }
}

//! Error types for multirun
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// All error types that can occur while orchestrating solver runs
#[derive(Debug, Error)]
pub enum MultirunError {
    /// Malformed command-line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Host operating system has no solver build
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Solver could not be started or exited non-zero
    #[error("Run #{run_index} failed: {reason}")]
    ExecutionFailure { run_index: u32, reason: String },

    /// Result file of a successful run is absent
    #[error("Result file not found: {}", .0.display())]
    ResultFileMissing(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for multirun operations
pub type Result<T> = std::result::Result<T, MultirunError>;

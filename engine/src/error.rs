//! Error types for the copy engine.
//!
//! The primary error type is `EngineError`, which represents job-level
//! errors that prevent a run from being executed or finished. Entry-level
//! errors (a single folder or file failing to copy) are recorded on the
//! GameEntry struct, not as EngineError.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur at the job level.
///
/// These errors are non-recoverable and stop the job. Entry-level errors
/// (per-folder or per-file copy failures) are recorded in GameEntry and
/// the run continues past them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Source directory does not exist
    #[error("source directory not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// Source directory is not accessible (permissions)
    #[error("source directory access denied: {}", .path.display())]
    SourceAccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to list a directory
    #[error("failed to list directory: {}", .path.display())]
    ListingFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read from a source file
    #[error("failed to read file: {}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write to a destination file
    #[error("failed to write file: {}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to create a directory
    #[error("failed to create directory: {}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to update a modification timestamp
    #[error("failed to set modification time: {}", .path.display())]
    TimestampFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path is invalid for the requested operation
    #[error("invalid path: {} ({reason})", .path.display())]
    InvalidPath { path: PathBuf, reason: String },
}

impl EngineError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Self::SourceAccessDenied { source, .. }
            | Self::ListingFailed { source, .. }
            | Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::TimestampFailed { source, .. } => source.raw_os_error().map(|e| e as u32),
            _ => None,
        }
    }
}

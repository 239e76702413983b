//! # Error Module
//!
//! User-friendly error types for the duplicate file finder.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Only root failures are fatal** - per-entry problems are logged and skipped

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DuplicateFinderError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while walking a directory tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    RootAccessDenied { path: PathBuf },

    #[error("Cannot read {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read entry {path}: {message}")]
    ReadEntry { path: PathBuf, message: String },

    #[error("A scan is already running")]
    AlreadyRunning,

    #[error("Failed to start scan thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Scan worker stopped unexpectedly")]
    WorkerPanicked,
}

impl ScanError {
    /// Map the io error from validating a scan root to its root error.
    pub fn from_root_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => ScanError::RootNotFound { path },
            std::io::ErrorKind::PermissionDenied => ScanError::RootAccessDenied { path },
            _ => ScanError::RootUnreadable { path, source },
        }
    }

    /// True for errors about the scan root itself, which end the scan.
    pub fn is_root_invalid(&self) -> bool {
        matches!(
            self,
            ScanError::RootNotFound { .. }
                | ScanError::RootAccessDenied { .. }
                | ScanError::RootUnreadable { .. }
        )
    }
}

/// Errors that occur while fingerprinting a file
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur when saving results to disk
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write results to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DuplicateFinderError>;

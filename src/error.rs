//! Error types for the shredder.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shredder operations.
pub type Result<T> = std::result::Result<T, ShredError>;

/// Errors that abort a shred operation.
///
/// Pass indices are zero-based; the `Display` output is one-based.
#[derive(Error, Debug)]
pub enum ShredError {
    /// The file could not be opened for read-write.
    #[error("Failed to open {} (pass {}): {source}", .path.display(), .pass + 1)]
    OpenFailed {
        path: PathBuf,
        pass: usize,
        #[source]
        source: io::Error,
    },

    /// The file size could not be queried.
    #[error("Failed to stat {} (pass {}): {source}", .path.display(), .pass + 1)]
    StatFailed {
        path: PathBuf,
        pass: usize,
        #[source]
        source: io::Error,
    },

    /// The file has no content to overwrite.
    #[error("File is empty: {}", .path.display())]
    EmptyFile { path: PathBuf },

    /// The random source could not produce bytes.
    #[error("Failed to generate random data for {} (pass {}): {source}", .path.display(), .pass + 1)]
    RandomSourceFailed {
        path: PathBuf,
        pass: usize,
        #[source]
        source: io::Error,
    },

    /// A chunk write failed.
    #[error("Failed to write {} at offset {offset} (pass {}): {source}", .path.display(), .pass + 1)]
    WriteFailed {
        path: PathBuf,
        pass: usize,
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// Flushing the pass to stable storage failed.
    #[error("Failed to sync {} (pass {}): {source}", .path.display(), .pass + 1)]
    SyncFailed {
        path: PathBuf,
        pass: usize,
        #[source]
        source: io::Error,
    },

    /// Closing the file handle failed.
    #[error("Failed to close {} (pass {}): {source}", .path.display(), .pass + 1)]
    CloseFailed {
        path: PathBuf,
        pass: usize,
        #[source]
        source: io::Error,
    },

    /// Unlinking the file failed.
    #[error("Failed to remove {}: {source}", .path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShredError {
    /// Name of the step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            ShredError::OpenFailed { .. } => "open",
            ShredError::StatFailed { .. } => "stat",
            ShredError::EmptyFile { .. } => "empty",
            ShredError::RandomSourceFailed { .. } => "random",
            ShredError::WriteFailed { .. } => "write",
            ShredError::SyncFailed { .. } => "sync",
            ShredError::CloseFailed { .. } => "close",
            ShredError::RemoveFailed { .. } => "remove",
        }
    }

    /// Path of the file being shredded.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ShredError::OpenFailed { path, .. }
            | ShredError::StatFailed { path, .. }
            | ShredError::EmptyFile { path }
            | ShredError::RandomSourceFailed { path, .. }
            | ShredError::WriteFailed { path, .. }
            | ShredError::SyncFailed { path, .. }
            | ShredError::CloseFailed { path, .. }
            | ShredError::RemoveFailed { path, .. } => path,
        }
    }

    /// Whether retrying without changing the file cannot succeed.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ShredError::EmptyFile { .. })
    }
}

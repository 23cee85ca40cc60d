//! File system layer for the shredder.
//!
//! This module handles:
//! - The capabilities the overwrite engine needs (open, stat, write, sync, close, remove)
//! - The real on-disk implementation
//! - An in-memory recording implementation for exercising the engine without disk I/O

mod local;
mod memory;

use std::io;
use std::path::Path;

pub use local::{LocalFile, LocalFileSystem};
pub use memory::{FsOp, FsStep, MemoryFile, MemoryFileSystem};

/// An open file, exclusively owned for the duration of one pass.
pub trait FileHandle {
    /// Current size of the file in bytes.
    fn size(&mut self) -> io::Result<u64>;

    /// Write all of `data` at the current cursor, advancing it.
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()>;

    /// Force written data to stable storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Release the handle, reporting any error the close produces.
    fn close(self) -> io::Result<()>;
}

/// Path-level file system operations.
pub trait FileSystem {
    /// Handle type returned by [`FileSystem::open_rw`].
    type Handle: FileHandle;

    /// Open an existing file for reading and writing.
    ///
    /// Must neither create nor truncate the file.
    fn open_rw(&self, path: &Path) -> io::Result<Self::Handle>;

    /// Unlink the file.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Ask the system to flush every file system to stable storage.
    fn sync_all(&self) -> io::Result<()>;
}

//! On-disk file system access.

use super::{FileHandle, FileSystem};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// The real file system, via `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

/// Handle for an on-disk file opened read-write.
#[derive(Debug)]
pub struct LocalFile {
    file: File,
}

impl FileSystem for LocalFileSystem {
    type Handle = LocalFile;

    fn open_rw(&self, path: &Path) -> io::Result<LocalFile> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(false)
            .truncate(false)
            .open(path)?;

        Ok(LocalFile { file })
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    #[cfg(unix)]
    fn sync_all(&self) -> io::Result<()> {
        // sync(2) schedules the flush and cannot report failure
        unsafe { libc::sync() };
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_all(&self) -> io::Result<()> {
        Ok(())
    }
}

impl FileHandle for LocalFile {
    fn size(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    #[cfg(unix)]
    fn close(self) -> io::Result<()> {
        use std::os::unix::io::IntoRawFd;

        let fd = self.file.into_raw_fd();
        // Dropping a File discards close(2) errors, so close the descriptor directly
        if unsafe { libc::close(fd) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn close(self) -> io::Result<()> {
        drop(self.file);
        Ok(())
    }
}

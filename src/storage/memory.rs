//! In-memory file system that records every operation.
//!
//! Cloning a [`MemoryFileSystem`] shares its state, so a caller can hand one
//! clone to a [`Shredder`](crate::Shredder) and inspect the journal through another.

use super::{FileHandle, FileSystem};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// A step that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsStep {
    Open,
    Stat,
    Write,
    Sync,
    Close,
    Remove,
    SyncAll,
}

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    Open(PathBuf),
    Stat(u64),
    Write { offset: u64, data: Vec<u8> },
    Sync,
    Close,
    Remove(PathBuf),
    SyncAll,
}

impl FsOp {
    /// The step this operation belongs to.
    pub fn step(&self) -> FsStep {
        match self {
            FsOp::Open(_) => FsStep::Open,
            FsOp::Stat(_) => FsStep::Stat,
            FsOp::Write { .. } => FsStep::Write,
            FsOp::Sync => FsStep::Sync,
            FsOp::Close => FsStep::Close,
            FsOp::Remove(_) => FsStep::Remove,
            FsOp::SyncAll => FsStep::SyncAll,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    files: HashMap<PathBuf, Vec<u8>>,
    journal: Vec<FsOp>,
    failures: HashSet<FsStep>,
}

impl State {
    /// Consume a pending injected failure for `step`, if any.
    fn check(&mut self, step: FsStep) -> io::Result<()> {
        if self.failures.remove(&step) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("injected {:?} failure", step),
            ));
        }
        Ok(())
    }
}

/// Shared in-memory file system.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    state: Arc<Mutex<State>>,
}

impl MemoryFileSystem {
    /// Create an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the journal from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create or replace a file.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.lock().files.insert(path.into(), content.into());
    }

    /// Current content of a file.
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    /// Whether a file exists.
    pub fn exists(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }

    /// Truncate or zero-extend a file, as an outside writer would.
    pub fn resize(&self, path: &Path, len: usize) {
        if let Some(data) = self.lock().files.get_mut(path) {
            data.resize(len, 0);
        }
    }

    /// Make the next operation of the given kind fail once.
    pub fn fail_next(&self, step: FsStep) {
        self.lock().failures.insert(step);
    }

    /// Every operation recorded so far, in order.
    pub fn journal(&self) -> Vec<FsOp> {
        self.lock().journal.clone()
    }

    /// Just the steps of the journal, in order.
    pub fn steps(&self) -> Vec<FsStep> {
        self.lock().journal.iter().map(FsOp::step).collect()
    }

    /// Forget the recorded journal.
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }
}

/// Handle to a file in a [`MemoryFileSystem`].
#[derive(Debug)]
pub struct MemoryFile {
    fs: MemoryFileSystem,
    path: PathBuf,
    cursor: u64,
}

impl FileSystem for MemoryFileSystem {
    type Handle = MemoryFile;

    fn open_rw(&self, path: &Path) -> io::Result<MemoryFile> {
        let mut state = self.lock();
        state.check(FsStep::Open)?;
        if !state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ));
        }
        state.journal.push(FsOp::Open(path.to_path_buf()));

        Ok(MemoryFile {
            fs: self.clone(),
            path: path.to_path_buf(),
            cursor: 0,
        })
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        state.check(FsStep::Remove)?;
        if state.files.remove(path).is_none() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ));
        }
        state.journal.push(FsOp::Remove(path.to_path_buf()));
        Ok(())
    }

    fn sync_all(&self) -> io::Result<()> {
        let mut state = self.lock();
        state.check(FsStep::SyncAll)?;
        state.journal.push(FsOp::SyncAll);
        Ok(())
    }
}

impl MemoryFile {
    fn missing(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} was removed while open", self.path.display()),
        )
    }
}

impl FileHandle for MemoryFile {
    fn size(&mut self) -> io::Result<u64> {
        let mut state = self.fs.lock();
        state.check(FsStep::Stat)?;
        let size = match state.files.get(&self.path) {
            Some(data) => data.len() as u64,
            None => return Err(self.missing()),
        };
        state.journal.push(FsOp::Stat(size));
        Ok(size)
    }

    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.fs.lock();
        state.check(FsStep::Write)?;
        let file = match state.files.get_mut(&self.path) {
            Some(file) => file,
            None => return Err(self.missing()),
        };

        let start = self.cursor as usize;
        let end = start + data.len();
        if file.len() < end {
            file.resize(end, 0);
        }
        file[start..end].copy_from_slice(data);

        state.journal.push(FsOp::Write {
            offset: self.cursor,
            data: data.to_vec(),
        });
        self.cursor = end as u64;
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        let mut state = self.fs.lock();
        state.check(FsStep::Sync)?;
        state.journal.push(FsOp::Sync);
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        let mut state = self.fs.lock();
        state.check(FsStep::Close)?;
        state.journal.push(FsOp::Close);
        Ok(())
    }
}

//! Multi-pass overwrite engine.
//!
//! Each pass is an independent open / stat / overwrite / sync / close cycle:
//!
//! ```text
//! for pass in 0..passes:
//!     open(rw) → size → [fill random → write] × ceil(size / buffer) → sync → close
//! remove → sync all file systems (best effort)
//! ```
//!
//! A pass's data is flushed to stable storage before its handle is closed and
//! before the next pass opens the file.

mod plan;

pub use plan::ChunkPlan;

use crate::config::ShredConfig;
use crate::entropy::{OsRandom, RandomSource};
use crate::error::{Result, ShredError};
use crate::inspect::{HexDumpInspector, Inspector};
use crate::storage::{FileHandle, FileSystem, LocalFileSystem};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Statistics for one completed overwrite pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Zero-based pass index.
    pub pass: usize,
    /// File size measured when the pass opened the file.
    pub size: u64,
    /// Number of chunks written.
    pub chunks: u64,
    /// Total bytes written; always equal to `size`.
    pub bytes_written: u64,
}

/// Summary of a successful shred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShredReport {
    /// Path of the removed file.
    pub path: PathBuf,
    /// One entry per pass, in order.
    pub passes: Vec<PassReport>,
}

impl ShredReport {
    /// Bytes written across all passes.
    pub fn bytes_written(&self) -> u64 {
        self.passes.iter().map(|p| p.bytes_written).sum()
    }
}

/// Overwrites files with random data, then removes them.
///
/// Holds no per-file state; one shredder can process any number of files
/// sequentially.
pub struct Shredder<F = LocalFileSystem, R = OsRandom> {
    config: ShredConfig,
    fs: F,
    rng: R,
    inspector: Option<Box<dyn Inspector + Send>>,
}

impl Shredder {
    /// Shredder over the local file system and the OS random generator.
    pub fn new(config: ShredConfig) -> Self {
        Self::with_parts(config, LocalFileSystem, OsRandom)
    }
}

impl Default for Shredder {
    fn default() -> Self {
        Self::new(ShredConfig::default())
    }
}

impl<F: FileSystem, R: RandomSource> Shredder<F, R> {
    /// Shredder over the given file system and random source.
    ///
    /// In debug mode a hex dump inspector writing to stderr is attached.
    pub fn with_parts(config: ShredConfig, fs: F, rng: R) -> Self {
        let config = config.normalized();
        let inspector: Option<Box<dyn Inspector + Send>> = if config.debug {
            Some(Box::new(HexDumpInspector::stderr(config.dump_limit)))
        } else {
            None
        };

        Self {
            config,
            fs,
            rng,
            inspector,
        }
    }

    /// Replace the inspector. It is only invoked when `config.debug` is set.
    pub fn with_inspector(mut self, inspector: Box<dyn Inspector + Send>) -> Self {
        self.inspector = Some(inspector);
        self
    }

    pub fn config(&self) -> &ShredConfig {
        &self.config
    }

    /// Overwrite `path` `config.passes` times, then remove it.
    ///
    /// Any error aborts immediately and leaves the file in whatever state the
    /// failing pass reached.
    pub fn shred(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.shred_with_report(path).map(|_| ())
    }

    /// Like [`Shredder::shred`], returning per-pass statistics.
    pub fn shred_with_report(&mut self, path: impl AsRef<Path>) -> Result<ShredReport> {
        let path = path.as_ref();
        self.inspect(path);

        // Reused for every chunk; refilled before each write
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut passes = Vec::with_capacity(self.config.passes);

        for pass in 0..self.config.passes {
            let report = self.overwrite_pass(path, pass, &mut buffer)?;
            info!(
                "Pass {}/{} complete for {} ({} bytes in {} chunks)",
                pass + 1,
                self.config.passes,
                path.display(),
                report.bytes_written,
                report.chunks
            );
            passes.push(report);
            self.inspect(path);
        }

        self.fs
            .remove(path)
            .map_err(|source| ShredError::RemoveFailed {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Removed {}", path.display());

        if let Err(e) = self.fs.sync_all() {
            warn!("File system sync after removing {} failed: {}", path.display(), e);
        }

        Ok(ShredReport {
            path: path.to_path_buf(),
            passes,
        })
    }

    /// One open / overwrite / sync / close cycle.
    fn overwrite_pass(&mut self, path: &Path, pass: usize, buffer: &mut [u8]) -> Result<PassReport> {
        let mut file = self
            .fs
            .open_rw(path)
            .map_err(|source| ShredError::OpenFailed {
                path: path.to_path_buf(),
                pass,
                source,
            })?;

        // Measured fresh every pass; never carried over from the previous one
        let size = file.size().map_err(|source| ShredError::StatFailed {
            path: path.to_path_buf(),
            pass,
            source,
        })?;
        if size == 0 {
            return Err(ShredError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        let plan = ChunkPlan::new(size, buffer.len());
        let chunks = plan.chunk_count();
        debug!(
            "Pass {}: {} is {} bytes, {} chunks of up to {} bytes",
            pass + 1,
            path.display(),
            size,
            chunks,
            buffer.len()
        );

        let mut offset = 0u64;
        for len in plan {
            let chunk = &mut buffer[..len];

            self.rng
                .fill(chunk)
                .map_err(|source| ShredError::RandomSourceFailed {
                    path: path.to_path_buf(),
                    pass,
                    source,
                })?;

            file.write_chunk(chunk)
                .map_err(|source| ShredError::WriteFailed {
                    path: path.to_path_buf(),
                    pass,
                    offset,
                    source,
                })?;

            offset += len as u64;
        }

        file.sync().map_err(|source| ShredError::SyncFailed {
            path: path.to_path_buf(),
            pass,
            source,
        })?;

        file.close().map_err(|source| ShredError::CloseFailed {
            path: path.to_path_buf(),
            pass,
            source,
        })?;

        Ok(PassReport {
            pass,
            size,
            chunks,
            bytes_written: offset,
        })
    }

    fn inspect(&mut self, path: &Path) {
        if !self.config.debug {
            return;
        }
        if let Some(inspector) = self.inspector.as_mut() {
            if let Err(e) = inspector.dump(path) {
                warn!("Inspector failed for {}: {}", path.display(), e);
            }
        }
    }
}

/// Shred `path` with the default configuration.
pub fn shred(path: impl AsRef<Path>) -> Result<()> {
    Shredder::default().shred(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FsOp, FsStep, MemoryFileSystem};
    use std::io;
    use std::sync::{Arc, Mutex};

    const SECRET: &[u8] = b"Sensitive data that needs to be shredded.";

    /// Deterministic source: a running byte counter.
    struct CountingRandom(u8);

    impl RandomSource for CountingRandom {
        fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
            for byte in buf.iter_mut() {
                *byte = self.0;
                self.0 = self.0.wrapping_add(1);
            }
            Ok(())
        }
    }

    struct FailingRandom;

    impl RandomSource for FailingRandom {
        fn fill(&mut self, _buf: &mut [u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "entropy exhausted"))
        }
    }

    /// Inspector backed by a closure.
    struct HookInspector<H>(H);

    impl<H: FnMut(&Path) -> io::Result<()>> Inspector for HookInspector<H> {
        fn dump(&mut self, path: &Path) -> io::Result<()> {
            (self.0)(path)
        }
    }

    fn setup(content: &[u8]) -> (MemoryFileSystem, PathBuf) {
        let fs = MemoryFileSystem::new();
        let path = PathBuf::from("/secret.txt");
        fs.insert(path.clone(), content.to_vec());
        (fs, path)
    }

    fn debug_config() -> ShredConfig {
        ShredConfig::default().with_debug(true)
    }

    /// Per-pass write lengths taken from the journal.
    fn write_lengths_per_pass(journal: &[FsOp]) -> Vec<Vec<usize>> {
        let mut passes = Vec::new();
        for op in journal {
            match op {
                FsOp::Open(_) => passes.push(Vec::new()),
                FsOp::Write { data, .. } => passes.last_mut().unwrap().push(data.len()),
                _ => {}
            }
        }
        passes
    }

    #[test]
    fn test_pass_sequence_ordering() {
        let (fs, path) = setup(SECRET);
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        shredder.shred(&path).unwrap();

        let pass = [
            FsStep::Open,
            FsStep::Stat,
            FsStep::Write,
            FsStep::Sync,
            FsStep::Close,
        ];
        let mut expected: Vec<FsStep> = pass.iter().cycle().take(15).copied().collect();
        expected.push(FsStep::Remove);
        expected.push(FsStep::SyncAll);

        assert_eq!(fs.steps(), expected);
        assert!(!fs.exists(&path));
    }

    #[test]
    fn test_writes_are_sequential_from_zero() {
        let (fs, path) = setup(&[0u8; 10_000]);
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        shredder.shred(&path).unwrap();

        let offsets: Vec<u64> = fs
            .journal()
            .iter()
            .filter_map(|op| match op {
                FsOp::Write { offset, .. } => Some(*offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, vec![0, 4096, 8192, 0, 4096, 8192, 0, 4096, 8192]);
    }

    #[test]
    fn test_exact_buffer_size_single_chunk() {
        let (fs, path) = setup(&[0xAAu8; 4096]);
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        let report = shredder.shred_with_report(&path).unwrap();

        assert_eq!(write_lengths_per_pass(&fs.journal()), vec![vec![4096]; 3]);
        assert!(report.passes.iter().all(|p| p.chunks == 1));
    }

    #[test]
    fn test_one_past_buffer_size_two_chunks() {
        let (fs, path) = setup(&[0xAAu8; 4097]);
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        let report = shredder.shred_with_report(&path).unwrap();

        assert_eq!(write_lengths_per_pass(&fs.journal()), vec![vec![4096, 1]; 3]);
        assert!(report.passes.iter().all(|p| p.chunks == 2 && p.bytes_written == 4097));
        assert_eq!(report.bytes_written(), 3 * 4097);
    }

    #[test]
    fn test_every_pass_covers_whole_file() {
        let (fs, path) = setup(SECRET);
        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let hook_fs = fs.clone();
        let hook_snapshots = snapshots.clone();

        let mut shredder = Shredder::with_parts(debug_config(), fs.clone(), OsRandom)
            .with_inspector(Box::new(HookInspector(move |p: &Path| -> io::Result<()> {
                hook_snapshots
                    .lock()
                    .unwrap()
                    .push(hook_fs.contents(p).unwrap_or_default());
                Ok(())
            })));

        shredder.shred(&path).unwrap();

        let snapshots = snapshots.lock().unwrap();
        // Before pass 1, then after each pass
        assert_eq!(snapshots.len(), 4);
        assert_eq!(snapshots[0], SECRET);
        for pair in snapshots.windows(2) {
            assert_eq!(pair[1].len(), SECRET.len());
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_empty_file_rejected() {
        let (fs, path) = setup(b"");
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        let err = shredder.shred(&path).unwrap_err();

        assert!(matches!(err, ShredError::EmptyFile { .. }));
        assert_eq!(fs.steps(), vec![FsStep::Open, FsStep::Stat]);
        assert!(fs.exists(&path));
    }

    #[test]
    fn test_missing_file_open_failed() {
        let fs = MemoryFileSystem::new();
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        let err = shredder.shred("/missing").unwrap_err();

        match err {
            ShredError::OpenFailed { pass, source, .. } => {
                assert_eq!(pass, 0);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(fs.journal().is_empty());
    }

    #[test]
    fn test_random_failure_aborts_before_write() {
        let (fs, path) = setup(SECRET);
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), FailingRandom);

        let err = shredder.shred(&path).unwrap_err();

        assert!(matches!(err, ShredError::RandomSourceFailed { pass: 0, .. }));
        assert!(!fs.steps().contains(&FsStep::Write));
        assert_eq!(fs.contents(&path).unwrap(), SECRET);
    }

    #[test]
    fn test_step_failures_map_to_errors() {
        let cases = [
            (FsStep::Stat, "stat"),
            (FsStep::Write, "write"),
            (FsStep::Sync, "sync"),
            (FsStep::Close, "close"),
            (FsStep::Remove, "remove"),
        ];

        for (step, name) in cases {
            let (fs, path) = setup(SECRET);
            fs.fail_next(step);
            let mut shredder =
                Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

            let err = shredder.shred(&path).unwrap_err();

            assert_eq!(err.step(), name);
            assert!(fs.exists(&path), "{} failure must leave the file", name);
            assert!(!fs.steps().contains(&FsStep::Remove));
        }
    }

    #[test]
    fn test_sync_failure_stops_before_close() {
        let (fs, path) = setup(SECRET);
        fs.fail_next(FsStep::Sync);
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        let err = shredder.shred(&path).unwrap_err();

        assert!(matches!(err, ShredError::SyncFailed { pass: 0, .. }));
        assert_eq!(
            fs.steps(),
            vec![FsStep::Open, FsStep::Stat, FsStep::Write]
        );
    }

    #[test]
    fn test_final_sync_failure_is_not_fatal() {
        let (fs, path) = setup(SECRET);
        fs.fail_next(FsStep::SyncAll);
        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs.clone(), CountingRandom(0));

        shredder.shred(&path).unwrap();

        assert!(!fs.exists(&path));
    }

    #[test]
    fn test_failure_in_later_pass_reports_pass_index() {
        let (fs, path) = setup(SECRET);
        let hook_fs = fs.clone();
        let mut calls = 0;

        let mut shredder = Shredder::with_parts(debug_config(), fs.clone(), CountingRandom(0))
            .with_inspector(Box::new(HookInspector(move |_: &Path| -> io::Result<()> {
                calls += 1;
                // Second call runs after pass 1 closes
                if calls == 2 {
                    hook_fs.fail_next(FsStep::Write);
                }
                Ok(())
            })));

        let err = shredder.shred(&path).unwrap_err();

        match err {
            ShredError::WriteFailed { pass, offset, .. } => {
                assert_eq!(pass, 1);
                assert_eq!(offset, 0);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_size_remeasured_each_pass() {
        let (fs, path) = setup(SECRET);
        let hook_fs = fs.clone();
        let mut calls = 0;

        let mut shredder = Shredder::with_parts(debug_config(), fs.clone(), CountingRandom(0))
            .with_inspector(Box::new(HookInspector(move |p: &Path| -> io::Result<()> {
                calls += 1;
                if calls == 2 {
                    hook_fs.resize(p, 5000);
                }
                Ok(())
            })));

        let report = shredder.shred_with_report(&path).unwrap();

        let sizes: Vec<u64> = report.passes.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![SECRET.len() as u64, 5000, 5000]);
        assert_eq!(report.passes[1].chunks, 2);
        assert!(report.passes.iter().all(|p| p.bytes_written == p.size));
    }

    #[test]
    fn test_inspector_failure_does_not_abort() {
        let (fs, path) = setup(SECRET);
        let mut shredder = Shredder::with_parts(debug_config(), fs.clone(), CountingRandom(0))
            .with_inspector(Box::new(HookInspector(|_: &Path| -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::Other, "dump failed"))
            })));

        shredder.shred(&path).unwrap();

        assert!(!fs.exists(&path));
    }

    #[test]
    fn test_inspector_skipped_without_debug() {
        let (fs, path) = setup(SECRET);
        let calls = Arc::new(Mutex::new(0));
        let hook_calls = calls.clone();

        let mut shredder = Shredder::with_parts(ShredConfig::default(), fs, CountingRandom(0))
            .with_inspector(Box::new(HookInspector(move |_: &Path| -> io::Result<()> {
                *hook_calls.lock().unwrap() += 1;
                Ok(())
            })));

        shredder.shred(&path).unwrap();

        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_custom_pass_count() {
        let (fs, path) = setup(SECRET);
        let config = ShredConfig::new(7, 16, false);
        let mut shredder = Shredder::with_parts(config, fs.clone(), CountingRandom(0));

        let report = shredder.shred_with_report(&path).unwrap();

        assert_eq!(report.passes.len(), 7);
        // 41 bytes with a 16-byte buffer: 16 + 16 + 9
        assert_eq!(write_lengths_per_pass(&fs.journal()), vec![vec![16, 16, 9]; 7]);
    }

    #[test]
    fn test_zero_passes_normalized() {
        let (fs, path) = setup(SECRET);
        let config = ShredConfig {
            passes: 0,
            ..Default::default()
        };
        let mut shredder = Shredder::with_parts(config, fs.clone(), CountingRandom(0));

        let report = shredder.shred_with_report(&path).unwrap();

        assert_eq!(report.passes.len(), 1);
        assert!(fs.steps().contains(&FsStep::Write));
    }
}

//! Random byte sources used to fill overwrite chunks.

use rand::rngs::OsRng;
use rand::RngCore;
use std::io;

/// A source of random bytes.
pub trait RandomSource {
    /// Fill `buf` entirely with fresh random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).fill(buf)
    }
}

/// The operating system's cryptographically secure generator.
///
/// Failures are reported, never papered over with a weaker generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        OsRng.try_fill_bytes(buf).map_err(io::Error::from)
    }
}

//! Chunk arithmetic for a single overwrite pass.

/// Lengths of the chunks that cover `size` bytes with a buffer of `buffer_size`.
///
/// Every chunk is `buffer_size` long except the last, which is
/// `size % buffer_size` when that is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    remaining: u64,
    buffer_size: u64,
}

impl ChunkPlan {
    /// Plan a pass over `size` bytes. A zero buffer size is treated as 1.
    pub fn new(size: u64, buffer_size: usize) -> Self {
        Self {
            remaining: size,
            buffer_size: buffer_size.max(1) as u64,
        }
    }

    /// Number of chunks still to be produced: `ceil(remaining / buffer_size)`.
    pub fn chunk_count(&self) -> u64 {
        self.remaining / self.buffer_size + u64::from(self.remaining % self.buffer_size != 0)
    }

    /// Bytes not yet covered.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for ChunkPlan {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let len = self.remaining.min(self.buffer_size);
        self.remaining -= len;
        Some(len as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.chunk_count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for ChunkPlan {}

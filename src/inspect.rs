//! Diagnostic hex dumps of file contents.
//!
//! An [`Inspector`] is read-only. The shredder calls it in debug mode before
//! the first pass and after every pass, and only logs its failures.

use crate::config::DEFAULT_DUMP_LIMIT;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Number of bytes rendered per dump line.
const BYTES_PER_LINE: usize = 16;

/// A read-only diagnostic view of a file.
pub trait Inspector {
    /// Render (part of) the file at `path`.
    fn dump(&mut self, path: &Path) -> io::Result<()>;
}

/// Writes a canonical hex dump of the first `limit` bytes of a file.
pub struct HexDumpInspector<W: Write> {
    out: W,
    limit: u64,
}

impl HexDumpInspector<io::Stderr> {
    /// Dump to standard error.
    pub fn stderr(limit: u64) -> Self {
        Self::new(io::stderr(), limit)
    }
}

impl<W: Write> HexDumpInspector<W> {
    pub fn new(out: W, limit: u64) -> Self {
        Self { out, limit }
    }

    /// Consume the inspector, returning its writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Default for HexDumpInspector<io::Stderr> {
    fn default() -> Self {
        Self::stderr(DEFAULT_DUMP_LIMIT)
    }
}

impl<W: Write> Inspector for HexDumpInspector<W> {
    fn dump(&mut self, path: &Path) -> io::Result<()> {
        let mut data = Vec::new();
        File::open(path)?.take(self.limit).read_to_end(&mut data)?;

        writeln!(self.out, "{}:", path.display())?;
        self.out.write_all(hex_dump(&data).as_bytes())?;
        self.out.flush()
    }
}

/// Format `data` as offset / hex / ASCII lines.
///
/// ```text
/// 00000000  53 65 6e 73 69 74 69 76  65 20 64 61 74 61 20 74  |Sensitive data t|
/// ```
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();

    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        out.push_str(&format!("{:08x}  ", line * BYTES_PER_LINE));

        for i in 0..BYTES_PER_LINE {
            match chunk.get(i) {
                Some(byte) => {
                    out.push_str(&hex::encode([*byte]));
                    out.push(' ');
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }

        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }

    out
}

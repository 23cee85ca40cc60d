//! Configuration constants and types for the shredder.

use serde::{Deserialize, Serialize};

/// Default number of overwrite passes.
pub const DEFAULT_PASSES: usize = 3;

/// Default overwrite buffer size (4KB, one block on most file systems).
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Default number of bytes shown by the hex dump inspector.
pub const DEFAULT_DUMP_LIMIT: u64 = 100;

/// Minimum number of overwrite passes.
pub const MIN_PASSES: usize = 1;

/// Maximum number of overwrite passes.
pub const MAX_PASSES: usize = 35;

/// Configuration for a [`Shredder`](crate::Shredder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShredConfig {
    /// Number of full overwrite passes before the file is removed.
    pub passes: usize,

    /// Size of the reusable overwrite buffer, i.e. the maximum chunk length.
    pub buffer_size: usize,

    /// Invoke the inspector before the first pass and after every pass.
    pub debug: bool,

    /// Upper bound on bytes read by the hex dump inspector.
    pub dump_limit: u64,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            passes: DEFAULT_PASSES,
            buffer_size: DEFAULT_BUFFER_SIZE,
            debug: false,
            dump_limit: DEFAULT_DUMP_LIMIT,
        }
    }
}

impl ShredConfig {
    /// Create a configuration with custom settings.
    ///
    /// Out-of-range values are clamped rather than rejected.
    pub fn new(passes: usize, buffer_size: usize, debug: bool) -> Self {
        Self {
            passes: passes.clamp(MIN_PASSES, MAX_PASSES),
            buffer_size: buffer_size.max(1),
            debug,
            dump_limit: DEFAULT_DUMP_LIMIT,
        }
    }

    /// Enable or disable debug dumps.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_size == 0 {
            return Err("Buffer size must be greater than 0".to_string());
        }
        if self.passes < MIN_PASSES || self.passes > MAX_PASSES {
            return Err(format!(
                "Pass count must be between {} and {}",
                MIN_PASSES, MAX_PASSES
            ));
        }
        Ok(())
    }

    /// Copy of this configuration with every value forced into range.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            passes: self.passes.clamp(MIN_PASSES, MAX_PASSES),
            buffer_size: self.buffer_size.max(1),
            debug: self.debug,
            dump_limit: self.dump_limit,
        }
    }
}

//! Secure file shredder
//!
//! Overwrites a file with cryptographically random data over several passes,
//! forcing every pass to stable storage, then unlinks it.
//!
//! # Features
//!
//! - **Multi-pass overwrite**: 3 passes by default, each re-measuring the file size
//! - **Durability ordering**: each pass is synced before its handle closes and the next pass begins
//! - **Pluggable capabilities**: random source and file system are traits, with an
//!   in-memory recording file system for tests
//! - **Debug inspector**: optional hex dump of the file before and after each pass
//!
//! # Architecture
//!
//! ```text
//! [open → stat → (random fill → write)* → sync → close] × passes → remove → sync
//! ```
//!
//! Assumes a conventional file system that overwrites in place. Copy-on-write
//! snapshots and SSD wear leveling can retain old blocks regardless.
//!
//! # Example
//!
//! ```rust,no_run
//! use shredder::{ShredConfig, Shredder};
//!
//! let mut shredder = Shredder::new(ShredConfig::default());
//! shredder.shred("secret.txt").unwrap();
//! assert!(!std::path::Path::new("secret.txt").exists());
//! ```

pub mod config;
pub mod entropy;
pub mod error;
pub mod inspect;
pub mod shredder;
pub mod storage;

pub use config::ShredConfig;
pub use error::{Result, ShredError};
pub use shredder::{shred, PassReport, ShredReport, Shredder};

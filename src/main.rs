//! shredder - overwrite files with random data, then delete them.
//!
//! Each file is overwritten several times with cryptographically random
//! bytes, every pass flushed to disk, before it is unlinked.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use shredder::config::{DEFAULT_DUMP_LIMIT, DEFAULT_PASSES};
use shredder::inspect::{HexDumpInspector, Inspector};
use shredder::{ShredConfig, Shredder};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content written by the self test.
const SELFTEST_CONTENT: &str = "Sensitive data that needs to be shredded.";

#[derive(Parser)]
#[command(name = "shredder")]
#[command(author, version)]
#[command(
    about = "Securely overwrite and delete files",
    long_about = "Overwrites files with cryptographically random data over several passes, syncing each pass to disk, then removes them."
)]
struct Cli {
    /// Hex dump files before and after each pass and log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Overwrite and remove files
    Shred {
        /// Files to shred
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Number of overwrite passes
        #[arg(long, default_value_t = DEFAULT_PASSES)]
        passes: usize,

        /// Shred every file under directories, then remove the directories
        #[arg(short, long)]
        recursive: bool,

        /// Print a JSON report per file instead of a confirmation line
        #[arg(long)]
        json: bool,
    },

    /// Hex dump the start of a file
    Dump {
        /// File to dump
        path: PathBuf,

        /// Maximum number of bytes to show
        #[arg(long, default_value_t = DEFAULT_DUMP_LIMIT)]
        limit: u64,
    },

    /// Create a sample file, shred it and check it is gone
    Selftest,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Shred {
            paths,
            passes,
            recursive,
            json,
        } => cmd_shred(&paths, passes, recursive, json, cli.debug),

        Commands::Dump { path, limit } => cmd_dump(&path, limit),

        Commands::Selftest => cmd_selftest(cli.debug),
    }
}

fn cmd_shred(paths: &[PathBuf], passes: usize, recursive: bool, json: bool, debug: bool) -> Result<()> {
    let config = ShredConfig {
        passes,
        debug,
        ..Default::default()
    };
    config.validate().map_err(anyhow::Error::msg)?;

    let mut shredder = Shredder::new(config);
    let mut failed = 0;

    for path in paths {
        let result = if recursive && path.is_dir() {
            shred_dir(&mut shredder, path, json)
        } else {
            shred_file(&mut shredder, path, json)
        };

        if let Err(e) = result {
            eprintln!("Error: {:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} paths could not be shredded", failed, paths.len());
    }
    Ok(())
}

fn shred_file(shredder: &mut Shredder, path: &Path, json: bool) -> Result<()> {
    let report = shredder.shred_with_report(path)?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "Shredded {} ({} passes, {} bytes written)",
            path.display(),
            report.passes.len(),
            report.bytes_written()
        );
    }
    Ok(())
}

fn shred_dir(shredder: &mut Shredder, dir: &Path, json: bool) -> Result<()> {
    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::remove_dir(path)
                .with_context(|| format!("Failed to remove directory {}", path.display()))?;
        } else if file_type.is_file() {
            shred_file(shredder, path, json)?;
        } else {
            warn!("Skipping {}: not a regular file", path.display());
        }
    }
    Ok(())
}

fn cmd_dump(path: &Path, limit: u64) -> Result<()> {
    let mut inspector = HexDumpInspector::new(io::stdout(), limit);
    inspector
        .dump(path)
        .with_context(|| format!("Failed to dump {}", path.display()))
}

fn cmd_selftest(debug: bool) -> Result<()> {
    let path = std::env::temp_dir().join(format!("shredder-selftest-{}.txt", std::process::id()));

    std::fs::write(&path, SELFTEST_CONTENT)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let before = std::fs::read(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if before != SELFTEST_CONTENT.as_bytes() {
        bail!("File content doesn't match initial data before shredding");
    }

    Shredder::new(ShredConfig::default().with_debug(debug))
        .shred(&path)
        .context("Failed to shred test file")?;

    match std::fs::symlink_metadata(&path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        _ => bail!("File still exists after shredding: {}", path.display()),
    }

    println!("Self test passed. File was shredded and deleted successfully.");
    Ok(())
}

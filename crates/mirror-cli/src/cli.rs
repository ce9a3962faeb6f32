//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mirror_core::DEFAULT_KEEP_LAST;

/// Mirror Sync - Reconcile a mirror folder against a source folder
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run a sync-and-verify pass
    ///
    /// Copies files missing from the internal folder, verifies
    /// already-copied files by size and checksum, and appends the run's
    /// audit section to the report.
    ///
    /// Examples:
    ///   mirror sync ./mirror /mnt/source
    ///   mirror sync ./mirror /mnt/source --force-recopy
    ///   mirror sync ./mirror /mnt/source --report ./sync_report.toml
    Sync {
        /// Internal folder (the mirror kept in sync)
        internal: PathBuf,

        /// External folder (the source of truth)
        external: PathBuf,

        /// Report artifact path
        #[arg(long, default_value = "sync_report.toml")]
        report: PathBuf,

        /// Re-copy files that vanished from the internal folder
        #[arg(long)]
        force_recopy: bool,

        /// Number of report backups to retain
        #[arg(long, default_value_t = DEFAULT_KEEP_LAST)]
        keep_last: usize,

        /// Error log path, written only when failures occur
        #[arg(long, default_value = "sync_errors.log")]
        error_log: PathBuf,

        /// Output the run summary as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the inventory and audit summary from a report
    Status {
        /// Report artifact path
        #[arg(long, default_value = "sync_report.toml")]
        report: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

//! Mirror Sync CLI
//!
//! The command-line interface for reconciling a mirror folder against a
//! source-of-truth folder.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::SyncArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Sync {
            internal,
            external,
            report,
            force_recopy,
            keep_last,
            error_log,
            json,
        }) => commands::run_sync(SyncArgs {
            internal,
            external,
            report,
            force_recopy,
            keep_last,
            error_log,
            json,
        }),
        Some(Commands::Status { report, json }) => commands::run_status(&report, json),
        None => {
            // No command provided - show help hint
            println!("{} Mirror Sync CLI", "mirror".green().bold());
            println!();
            println!("Run {} for available commands.", "mirror --help".cyan());
            Ok(())
        }
    }
}

//! Sync command implementation
//!
//! Runs the reconciliation engine on a background worker thread so the
//! terminal stays responsive; progress and status events flow back over an
//! mpsc channel into an indicatif progress bar. Only one run executes per
//! invocation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mirror_core::{Reporter, RunSummary, SyncEngine, SyncOptions};
use mirror_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Arguments for the sync command
#[derive(Debug)]
pub struct SyncArgs {
    pub internal: PathBuf,
    pub external: PathBuf,
    pub report: PathBuf,
    pub force_recopy: bool,
    pub keep_last: usize,
    pub error_log: PathBuf,
    pub json: bool,
}

/// Events emitted by the engine worker
enum Event {
    Progress(usize, usize),
    Status(String),
}

/// Reporter forwarding engine callbacks onto the event channel
struct ChannelReporter {
    tx: Sender<Event>,
}

impl Reporter for ChannelReporter {
    fn progress(&self, current: usize, total: usize) {
        // A disconnected receiver only means the display is gone
        let _ = self.tx.send(Event::Progress(current, total));
    }

    fn status(&self, message: &str) {
        let _ = self.tx.send(Event::Status(message.to_string()));
    }
}

/// Run the sync command
pub fn run_sync(args: SyncArgs) -> Result<()> {
    if !args.external.is_dir() {
        return Err(CliError::user(format!(
            "External folder not found: {}",
            args.external.display()
        )));
    }

    let engine = SyncEngine::new(
        NormalizedPath::new(&args.internal),
        NormalizedPath::new(&args.external),
        &args.report,
    )
    .with_options(SyncOptions {
        force_recopy: args.force_recopy,
        keep_last: args.keep_last,
    });

    if !args.json {
        println!(
            "{} Syncing {} from {}...",
            "=>".blue().bold(),
            args.internal.display(),
            args.external.display()
        );
    }

    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || engine.run(&ChannelReporter { tx }));

    let bar = if args.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(ProgressStyle::default_bar());
        bar
    };

    // Drains until the worker drops its sender
    for event in rx {
        match event {
            Event::Progress(current, total) => {
                bar.set_length(total as u64);
                bar.set_position(current as u64);
            }
            Event::Status(message) => bar.set_message(message),
        }
    }
    bar.finish_and_clear();

    let summary = worker
        .join()
        .map_err(|_| CliError::user("Sync worker panicked"))??;

    write_error_log(&args.error_log, &summary)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &args.error_log);
    }

    Ok(())
}

/// Write the error log, only when failures occurred
fn write_error_log(path: &Path, summary: &RunSummary) -> Result<()> {
    if summary.has_errors() {
        fs::write(path, summary.error_lines.join("\n"))?;
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, error_log: &Path) {
    println!("{} Sync complete:", "OK".green().bold());
    println!("   {} Copied:     {}", "+".green(), summary.copied);
    println!("   {} Verified:   {}", "+".green(), summary.verified);
    println!("   {} Mismatched: {}", "!".yellow(), summary.mismatched);
    println!("   {} Missing:    {}", "-".red(), summary.missing);

    if summary.has_errors() {
        println!();
        println!(
            "{} {} errors logged to {}",
            "WARN".yellow().bold(),
            summary.error_lines.len(),
            error_log.display().to_string().cyan()
        );
    }
}

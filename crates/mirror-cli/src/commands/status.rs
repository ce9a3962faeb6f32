//! Status command implementation

use std::path::Path;

use colored::Colorize;
use mirror_core::Report;

use crate::error::Result;

/// Run the status command
///
/// Read-only view of the report: inventory tallies and the most recent
/// audit section.
pub fn run_status(report_path: &Path, json: bool) -> Result<()> {
    if !report_path.exists() {
        if json {
            println!("{}", serde_json::json!({ "report": null }));
        } else {
            println!("{}", "No report found".red().bold());
            println!();
            println!("Run {} to create one.", "mirror sync".cyan());
        }
        return Ok(());
    }

    let report = Report::load(report_path)?;

    let total = report.records().len();
    let copied = report
        .records()
        .iter()
        .filter(|r| r.date_copied.is_some())
        .count();
    let flagged = report.records().iter().filter(|r| r.flagged).count();
    let last_audit = report.audits().last();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "report": report_path.display().to_string(),
                "records": total,
                "copied": copied,
                "flagged": flagged,
                "runs": report.audits().len(),
                "last_run": last_audit.map(|a| a.name.clone()),
            }))?
        );
        return Ok(());
    }

    println!("{}", "Sync Report Status".bold());
    println!();
    println!("{}:   {}", "Report".dimmed(), report_path.display());
    println!("{}:  {}", "Records".dimmed(), total);
    println!("{}:   {} of {}", "Copied".dimmed(), copied, total);
    if flagged > 0 {
        println!(
            "{}:  {} {}",
            "Flagged".dimmed(),
            flagged.to_string().red().bold(),
            "rows need attention".red()
        );
    } else {
        println!("{}:  {}", "Flagged".dimmed(), "none".green());
    }
    println!();

    match last_audit {
        Some(section) => {
            println!(
                "{}: {} ({} runs recorded)",
                "Last run".bold(),
                section.name.cyan(),
                report.audits().len()
            );
        }
        None => println!("{}", "No runs recorded yet".dimmed()),
    }

    Ok(())
}

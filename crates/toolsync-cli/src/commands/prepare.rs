//! The prepare command: resolve, then set up every package

use colored::Colorize;
use toolsync_core::{DryRunWriter, FsManifestWriter, ManifestWriter, SetupReport};

use crate::cli::ResolveArgs;
use crate::error::Result;
use crate::session::Session;

/// Run the prepare command
///
/// With `dry_run`, manifests are collected in memory and listed instead of
/// written.
pub async fn run_prepare(input: &ResolveArgs, dry_run: bool) -> Result<()> {
    println!("{} Preparing workspace...", "=>".blue().bold());

    let mut session = Session::open(input)?;
    if let Some(path) = &session.config_file {
        println!("   {} {}", "config".dimmed(), path.to_string().cyan());
    }

    let resolved = session.resolve().await?;
    println!(
        "   {} {} plugin(s) loaded",
        "plugins".dimmed(),
        resolved.plugins().len()
    );

    let dry_run_writer = DryRunWriter::new();
    let writer: &dyn ManifestWriter = if dry_run {
        &dry_run_writer
    } else {
        &FsManifestWriter
    };
    let report = session.engine.setup(&resolved, writer).await?;

    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &SetupReport, dry_run: bool) {
    if report.packages.is_empty() {
        println!(
            "{} No packages found (missing package.json in workspace root).",
            "WARN".yellow().bold()
        );
        return;
    }

    for outcome in &report.packages {
        if outcome.changed {
            let verb = if dry_run { "would update" } else { "updated" };
            println!("   {} {} ({})", "+".green(), outcome.package.cyan(), verb);
        } else {
            println!("   {} {}", "-".dimmed(), outcome.package.dimmed());
        }
    }

    println!();
    if dry_run {
        println!(
            "{} Dry run: {} of {} package(s) would change. No files written.",
            "OK".green().bold(),
            report.changed_count(),
            report.packages.len()
        );
    } else {
        println!(
            "{} {} of {} package(s) updated.",
            "OK".green().bold(),
            report.changed_count(),
            report.packages.len()
        );
    }
}

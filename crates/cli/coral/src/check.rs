//! Check command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use cr_driver::{CheckReport, DriverError};
use cr_regionck::RegionckConfig;
use std::path::Path;

/// What to print for each checked function.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Summary,
    Dump,
    Json,
}

pub fn check(paths: &[std::path::PathBuf], config: Option<&Path>, output: Output) -> Result<()> {
    let config = match config {
        Some(path) => RegionckConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => RegionckConfig::default(),
    };
    tracing::debug!(?config, "configuration");

    let mut failures = 0;
    for path in paths {
        match cr_driver::check_file(path, config) {
            Ok(report) => print_report(path, &report, output)?,
            Err(err) => {
                failures += 1;
                report_error(path, &err);
            }
        }
    }

    if failures > 0 {
        eprintln!("{} {} of {} files", "Failed:".red().bold(), failures, paths.len());
        anyhow::bail!("region check failed for {} files", failures);
    }
    Ok(())
}

fn print_report(path: &Path, report: &CheckReport, output: Output) -> Result<()> {
    match output {
        Output::Json => {
            let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
            println!("{json}");
        }
        Output::Dump => {
            println!("{} {}", "Function".green().bold(), report.function);
            print!("{}", report.dump);
        }
        Output::Summary => {
            println!(
                "{} {} ({})",
                "Checked".green().bold(),
                report.function,
                path.display()
            );
            println!(
                "    {} regions, {} loans, solved in {} passes",
                report.regions.len(),
                report.loans.len(),
                report.inference_passes
            );
            for loan in &report.loans {
                println!(
                    "    {} {} borrow of `{}` at node {}, region {}",
                    loan.id.bold(),
                    loan.kind,
                    loan.path,
                    loan.origin,
                    loan.region
                );
            }
            for node in &report.nodes {
                if !node.in_scope_loans.is_empty() {
                    println!("    node {}: in scope {}", node.id, node.in_scope_loans.join(", "));
                }
                for action in &node.moves {
                    println!("    node {}: {} {}", node.id, "move".yellow(), action);
                }
            }
        }
    }
    Ok(())
}

fn report_error(path: &Path, err: &DriverError) {
    eprintln!("{} {}: {}", "error".red().bold(), path.display(), err);
    if let Some(span) = err.span() {
        eprintln!("  {} {}", "-->".blue().bold(), span);
    }
}

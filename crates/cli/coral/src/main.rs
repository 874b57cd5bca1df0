//! Coral command line
//!
//! Runs the region checker over serialized functions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod check;

#[derive(Parser)]
#[command(name = "coral")]
#[command(about = "Region-based borrow checker", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one or more function fixtures
    Check {
        /// JSON fixture files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the region and constraint dump
        #[arg(long)]
        dump: bool,

        /// Print the full report as JSON
        #[arg(long, conflicts_with = "dump")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            config,
            dump,
            json,
        } => {
            let output = if json {
                check::Output::Json
            } else if dump {
                check::Output::Dump
            } else {
                check::Output::Summary
            };
            check::check(&paths, config.as_deref(), output)?;
        }
    }

    Ok(())
}

//! # controls CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros for argument parsing; verbosity maps to a
//! tracing filter.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use controls_cli::export::{run_export, ExportArgs};
use controls_cli::preview::{run_preview, PreviewArgs};

/// Compliance control manifest builder.
///
/// Normalizes the event and field references of a control working set
/// against the controlled vocabulary and renders one deterministic
/// YAML manifest for downstream tooling.
#[derive(Parser, Debug)]
#[command(name = "controls", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the manifest from a control set plus vocabulary documents.
    Export(ExportArgs),

    /// Render a single control as it would appear in the manifest.
    Preview(PreviewArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Export(args) => run_export(&args),
        Commands::Preview(args) => run_preview(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

//! # Export Subcommand
//!
//! Manifest generation and deterministic byte-level verification.
//!
//! Builds the manifest from the control set and vocabulary documents
//! and either writes it or, with `--check`, compares the rendering
//! against the existing output file. The manifest is a pure function of
//! its inputs and the resolved `generated_at` timestamp, so an
//! unchanged working set verifies byte-for-byte.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use controls_core::Timestamp;
use controls_manifest::Manifest;

/// Arguments for the `controls export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the control set document (YAML or JSON).
    #[arg(value_name = "CONTROLS")]
    pub controls: PathBuf,

    /// Path to the vocabulary parser output document.
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// Path to the static vocabulary block (regulations, SLAs, roles).
    #[arg(long)]
    pub static_vocabulary: Option<PathBuf>,

    /// Output path for the manifest. Prints to stdout when omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Override the generated_at timestamp for deterministic output.
    #[arg(long)]
    pub generated_at: Option<String>,

    /// Verify the existing manifest matches instead of writing.
    #[arg(long, requires = "out")]
    pub check: bool,
}

/// Execute the export subcommand.
///
/// Returns exit code: 0 on success, 1 if --check fails.
pub fn run_export(args: &ExportArgs) -> Result<u8> {
    let (controls, vocabulary) = crate::load_inputs(
        &args.controls,
        args.vocabulary.as_deref(),
        args.static_vocabulary.as_deref(),
    )?;

    let generated_at = resolve_generated_at(args)?;
    let manifest = Manifest::build(&controls, &vocabulary, generated_at);
    let rendered = manifest.to_yaml()?;

    match &args.out {
        Some(out) if args.check => check_existing(out, &rendered),
        Some(out) => {
            std::fs::write(out, &rendered)
                .with_context(|| format!("failed to write manifest: {}", out.display()))?;
            println!("OK: wrote manifest to {}", out.display());
            Ok(0)
        }
        None => {
            print!("{rendered}");
            Ok(0)
        }
    }
}

/// Resolve the generated_at timestamp.
///
/// Priority:
/// 1. Explicit --generated-at flag
/// 2. Existing manifest's generated_at (for --check stability)
/// 3. SOURCE_DATE_EPOCH environment variable
/// 4. Current UTC time
fn resolve_generated_at(args: &ExportArgs) -> Result<Timestamp> {
    if let Some(ref ts) = args.generated_at {
        return Timestamp::parse_rfc3339(ts)
            .with_context(|| format!("invalid --generated-at value: {ts}"));
    }

    // Reuse the existing manifest's timestamp for stability.
    if let Some(ref out) = args.out {
        if let Some(ts) = existing_generated_at(out) {
            return Ok(ts);
        }
    }

    if let Ok(epoch_str) = std::env::var("SOURCE_DATE_EPOCH") {
        if let Ok(epoch) = epoch_str.parse::<i64>() {
            if let Some(ts) = Timestamp::from_epoch_secs(epoch) {
                return Ok(ts);
            }
        }
    }

    Ok(Timestamp::now())
}

/// Read the generated_at of an existing manifest, if one parses.
fn existing_generated_at(out: &Path) -> Option<Timestamp> {
    let content = std::fs::read_to_string(out).ok()?;
    let existing: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
    let ts = existing.get("generated_at")?.as_str()?;
    Timestamp::parse_rfc3339(ts).ok()
}

/// Compare the rendered manifest against the existing file.
fn check_existing(out: &Path, rendered: &str) -> Result<u8> {
    if !out.exists() {
        println!("FAIL: manifest does not exist: {}", out.display());
        return Ok(1);
    }

    let existing = std::fs::read_to_string(out)
        .with_context(|| format!("failed to read manifest: {}", out.display()))?;

    // Allow a trailing newline difference.
    let matches = existing == rendered
        || existing.trim_end_matches('\n') == rendered.trim_end_matches('\n');

    if matches {
        println!("OK: manifest is up to date");
        Ok(0)
    } else {
        println!("FAIL: manifest is outdated or differs from computed manifest");
        if let Some((line, expected, found)) = first_difference(rendered, &existing) {
            println!("  first difference at line {line}:");
            println!("    expected: {expected}");
            println!("    found:    {found}");
        }
        Ok(1)
    }
}

/// Locate the first line where two renderings disagree.
fn first_difference<'a>(expected: &'a str, found: &'a str) -> Option<(usize, &'a str, &'a str)> {
    let mut expected_lines = expected.lines();
    let mut found_lines = found.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (expected_lines.next(), found_lines.next()) {
            (None, None) => return None,
            (e, f) if e == f => continue,
            (e, f) => return Some((line, e.unwrap_or(""), f.unwrap_or(""))),
        }
    }
}

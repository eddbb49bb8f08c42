//! # Preview Subcommand
//!
//! Renders one control as it would appear in the manifest, with a
//! vocabulary reconciliation report, so authors can see unregistered
//! references before exporting the whole working set.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use controls_manifest::{ControlPreview, ManifestError};

/// Arguments for the `controls preview` subcommand.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Path to the control set document (YAML or JSON).
    #[arg(value_name = "CONTROLS")]
    pub controls: PathBuf,

    /// Control to preview, matched on scoped_id first, then id.
    #[arg(long)]
    pub id: String,

    /// Path to the vocabulary parser output document.
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// Path to the static vocabulary block (regulations, SLAs, roles).
    #[arg(long)]
    pub static_vocabulary: Option<PathBuf>,
}

/// Execute the preview subcommand.
///
/// Returns exit code 0; an unknown id is an operational error.
pub fn run_preview(args: &PreviewArgs) -> Result<u8> {
    let (controls, vocabulary) = crate::load_inputs(
        &args.controls,
        args.vocabulary.as_deref(),
        args.static_vocabulary.as_deref(),
    )?;

    let control = controls
        .find(&args.id)
        .ok_or_else(|| ManifestError::ControlNotFound {
            wanted: args.id.clone(),
        })?;

    let preview = ControlPreview::build(control, &vocabulary);
    print!("{}", preview.to_yaml()?);
    Ok(0)
}

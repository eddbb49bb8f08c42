//! # controls-cli: CLI Tool for the Controls Builder
//!
//! Provides the `controls` command-line interface over the manifest
//! pipeline in `controls-manifest`.
//!
//! ## Subcommands
//!
//! - `controls export`: build the vocabulary manifest, write it or
//!   verify an existing file byte-for-byte.
//! - `controls preview`: render a single control as it would appear
//!   in the manifest, with its vocabulary reconciliation report.
//!
//! ## Determinism
//!
//! Export output depends only on the input documents and the resolved
//! `generated_at` timestamp, so pinning the timestamp (flag, existing
//! file, or `SOURCE_DATE_EPOCH`) makes reruns byte-identical:
//!
//! ```bash
//! controls export controls.yaml --vocabulary vocab.yaml --out manifest.yaml
//! controls export controls.yaml --vocabulary vocab.yaml --out manifest.yaml --check
//! ```

pub mod export;
pub mod preview;

use std::path::Path;

use anyhow::Result;

use controls_manifest::{
    adapt_vocabulary, load_document, ControlSet, StaticVocabulary, Vocabulary, VocabularyDocument,
};

/// Load the control set and merge the vocabulary documents.
///
/// Both vocabulary paths are optional; an absent document contributes
/// nothing, so a bare control set still exports (every reference lands
/// unregistered).
pub fn load_inputs(
    controls_path: &Path,
    vocabulary_path: Option<&Path>,
    static_vocabulary_path: Option<&Path>,
) -> Result<(ControlSet, Vocabulary)> {
    let controls: ControlSet = load_document(controls_path)?;

    let document: VocabularyDocument = match vocabulary_path {
        Some(path) => load_document(path)?,
        None => VocabularyDocument::default(),
    };
    let static_data: StaticVocabulary = match static_vocabulary_path {
        Some(path) => load_document(path)?,
        None => StaticVocabulary::default(),
    };

    tracing::debug!(
        controls = controls.controls.len(),
        parsed_events = document.events.len(),
        parsed_fields = document.fields.len(),
        "loaded input documents"
    );

    Ok((controls, adapt_vocabulary(document, static_data)))
}

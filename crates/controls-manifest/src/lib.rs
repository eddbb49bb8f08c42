//! # controls-manifest: The Manifest Pipeline
//!
//! Turns a working set of compliance controls plus a controlled
//! vocabulary into one deterministic export document. The pipeline has
//! three stages:
//!
//! - **Projection** ([`index`]): normalizes each control's free-text
//!   event and field references, flattens the control to its manifest
//!   entry, and builds the three reverse indexes.
//!
//! - **Reconciliation** ([`registry`], [`regulation`]): unions
//!   referenced ids with the vocabulary into event and field
//!   registries, and matches cited rules against canonical regulation
//!   citations.
//!
//! - **Assembly** ([`manifest`]): stitches the registries, static
//!   vocabulary blocks, and summary counts into a [`Manifest`] and
//!   renders it as YAML.
//!
//! ## Data Format
//!
//! Inputs are YAML or JSON documents loaded via [`load_document`];
//! external vocabulary exports are reshaped by [`adapt_vocabulary`].
//! Output ordering is insertion ordering throughout, so the rendered
//! YAML is byte-stable for unchanged inputs at a fixed timestamp.

pub mod adapter;
pub mod control;
pub mod error;
pub mod index;
pub mod manifest;
pub mod parser;
pub mod registry;
pub mod regulation;
pub mod summary;
pub mod vocabulary;

// Re-export primary types.
pub use adapter::{adapt_vocabulary, StaticVocabulary, VocabularyDocument};
pub use control::{Control, ControlSet};
pub use error::{ManifestError, ManifestResult};
pub use index::{ControlEntry, ControlIndex};
pub use manifest::{ControlPreview, Manifest, VocabularyStatus, GENERATOR, MANIFEST_VERSION};
pub use parser::load_document;
pub use registry::{EventEntry, FieldEntry};
pub use regulation::RegulationEntry;
pub use summary::ManifestSummary;
pub use vocabulary::Vocabulary;

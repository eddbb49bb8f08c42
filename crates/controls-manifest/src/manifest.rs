//! # Manifest Assembly
//!
//! Ties the pipeline together: controls in, registries built, one
//! serializable document out. The YAML rendering follows struct and
//! map insertion order, so two builds over the same inputs with the
//! same timestamp produce byte-identical output.
//!
//! ## Data Model
//!
//! - [`Manifest`] is the complete export document.
//! - [`ControlPreview`] is the single-control view with a vocabulary
//!   reconciliation report, used by the preview command.

use controls_core::{ControlKey, EventId, FieldId, ReferenceNormalizer, Timestamp};
use indexmap::{IndexMap, IndexSet};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use crate::control::{Control, ControlSet};
use crate::error::ManifestResult;
use crate::index::{ControlEntry, ControlIndex};
use crate::registry::{build_event_registry, build_field_registry, EventEntry, FieldEntry};
use crate::regulation::{build_regulation_registry, RegulationEntry};
use crate::summary::ManifestSummary;
use crate::vocabulary::Vocabulary;

/// Manifest format version.
pub const MANIFEST_VERSION: &str = "1.0";

/// Generator tag stamped into every manifest.
pub const GENERATOR: &str = "controls-builder";

/// The complete export document. Field declaration order is the YAML
/// key order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version, currently [`MANIFEST_VERSION`].
    pub version: String,
    /// Build timestamp, UTC second precision.
    pub generated_at: Timestamp,
    /// Tool identifier, [`GENERATOR`].
    pub generator: String,
    /// Control entries keyed by scoped id.
    pub controls: IndexMap<ControlKey, ControlEntry>,
    /// Event registry, referenced ids first.
    pub events: IndexMap<EventId, EventEntry>,
    /// Field registry, referenced ids first.
    pub fields: IndexMap<FieldId, FieldEntry>,
    /// Regulation registry keyed by citation text.
    pub regulations: IndexMap<String, RegulationEntry>,
    /// SLA pattern block, passed through from the static vocabulary.
    pub sla_patterns: serde_yaml::Value,
    /// Role names, passed through from the static vocabulary.
    pub roles: Vec<String>,
    /// Audit log suffixes, passed through from the static vocabulary.
    pub audit_suffixes: Vec<String>,
    /// Aggregate counts and source file list.
    pub summary: ManifestSummary,
}

impl Manifest {
    /// Build a manifest from a control set and a merged vocabulary at
    /// the given timestamp.
    pub fn build(controls: &ControlSet, vocabulary: &Vocabulary, generated_at: Timestamp) -> Self {
        let index = ControlIndex::build(&controls.controls);
        let events = build_event_registry(vocabulary, &index.by_event);
        let fields = build_field_registry(vocabulary, &index.by_input_field, &index.by_output_field);
        let regulations = build_regulation_registry(&controls.controls, vocabulary);
        let summary =
            ManifestSummary::compute(&controls.controls, &index.entries, &events, &fields);

        tracing::debug!(
            controls = index.entries.len(),
            events = events.len(),
            fields = fields.len(),
            regulations = regulations.len(),
            "manifest assembled"
        );

        Manifest {
            version: MANIFEST_VERSION.to_string(),
            generated_at,
            generator: GENERATOR.to_string(),
            controls: index.entries,
            events,
            fields,
            regulations,
            sla_patterns: vocabulary.sla_patterns.clone(),
            roles: vocabulary.roles.clone(),
            audit_suffixes: vocabulary.audit_suffixes.clone(),
            summary,
        }
    }

    /// Render the manifest as YAML.
    pub fn to_yaml(&self) -> ManifestResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Which of a control's references resolve against the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyStatus {
    /// Trigger events found in the vocabulary.
    pub registered_events: Vec<EventId>,
    /// Trigger events missing from the vocabulary.
    pub unregistered_events: Vec<EventId>,
    /// Input and output fields found in the vocabulary.
    pub registered_fields: Vec<FieldId>,
    /// Input and output fields missing from the vocabulary.
    pub unregistered_fields: Vec<FieldId>,
}

/// Single-control export preview: the entry as it would appear in the
/// manifest, plus a reconciliation report against the vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPreview {
    /// Scoped key the entry would be stored under.
    pub key: ControlKey,
    /// The projected manifest entry.
    pub entry: ControlEntry,
    /// Reconciliation of the entry's references.
    pub vocabulary_status: VocabularyStatus,
}

// Serialized by hand so the control entry sits under its scoped key,
// exactly as it would in the full manifest.
impl Serialize for ControlPreview {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.key, &self.entry)?;
        map.serialize_entry("vocabulary_status", &self.vocabulary_status)?;
        map.end()
    }
}

impl ControlPreview {
    /// Project one control and reconcile its references against the
    /// vocabulary.
    pub fn build(control: &Control, vocabulary: &Vocabulary) -> Self {
        let normalizer = ReferenceNormalizer::new();
        let references = control.normalized_references(&normalizer);

        let vocab_fields: IndexSet<FieldId> = vocabulary
            .fields
            .keys()
            .map(|path| FieldId::new(path.replace("[]", "")))
            .collect();

        let mut registered_events = Vec::new();
        let mut unregistered_events = Vec::new();
        for event_id in &references.triggers {
            if vocabulary.events.contains_key(event_id) {
                registered_events.push(event_id.clone());
            } else {
                unregistered_events.push(event_id.clone());
            }
        }

        let all_fields: IndexSet<FieldId> = references
            .inputs
            .iter()
            .chain(&references.outputs)
            .cloned()
            .collect();
        let mut registered_fields = Vec::new();
        let mut unregistered_fields = Vec::new();
        for field_id in all_fields {
            if vocab_fields.contains(&field_id) {
                registered_fields.push(field_id);
            } else {
                unregistered_fields.push(field_id);
            }
        }

        ControlPreview {
            key: control.key(),
            entry: ControlEntry::project(control, references),
            vocabulary_status: VocabularyStatus {
                registered_events,
                unregistered_events,
                registered_fields,
                unregistered_fields,
            },
        }
    }

    /// Render the preview as YAML.
    pub fn to_yaml(&self) -> ManifestResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

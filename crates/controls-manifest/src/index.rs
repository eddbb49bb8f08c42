//! # Control Index
//!
//! The first derived structure of a build: the flattened control
//! entries that go into the manifest, plus the three reverse indexes
//! that answer "which controls depend on this id".
//!
//! ## Data Model
//!
//! - [`ControlEntry`]: a control's manifest projection (narrative fields
//!   dropped, references normalized).
//! - [`ControlIndex`]: entries keyed by control key, with reverse
//!   indexes by event, input field, and output field.
//!
//! Everything is built in one pass over the working set and is
//! insertion-ordered: entries in authoring order, each reverse-index id
//! at its first reference, each id's control list in reference order.

use controls_core::{ControlKey, EventId, FieldId, ReferenceNormalizer};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::control::{Control, NormalizedReferences};

/// A control's projection into the manifest.
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEntry {
    /// Short control code.
    pub id: String,
    /// Human-readable control name.
    pub name: String,
    /// Source document the control was authored in.
    pub source_file: String,
    /// What the control exists to ensure.
    pub purpose: String,
    /// Ordered regulation citations.
    pub primary_rules: Vec<String>,
    /// Canonical trigger event ids, deduplicated in order.
    pub triggers: Vec<EventId>,
    /// Canonical input field ids, deduplicated in order.
    pub inputs: Vec<FieldId>,
    /// Canonical output field ids, deduplicated in order.
    pub outputs: Vec<FieldId>,
    /// Literal audit event names, passed through.
    pub audit_logs: Vec<String>,
}

impl ControlEntry {
    /// Project a control and its normalized references into a manifest
    /// entry.
    pub fn project(control: &Control, references: NormalizedReferences) -> Self {
        Self {
            id: control.id.clone(),
            name: control.name.clone(),
            source_file: control.source_file.clone(),
            purpose: control.purpose.clone(),
            primary_rules: control.primary_rules.clone(),
            triggers: references.triggers,
            inputs: references.inputs,
            outputs: references.outputs,
            audit_logs: control.audit_logs.clone(),
        }
    }
}

/// Control entries plus the reverse indexes derived from one working
/// set.
#[derive(Debug, Clone, Default)]
pub struct ControlIndex {
    /// Manifest entries keyed by control key. Duplicate keys: the later
    /// control's entry wins, at the earlier position.
    pub entries: IndexMap<ControlKey, ControlEntry>,
    /// Controls triggered by each event id.
    pub by_event: IndexMap<EventId, Vec<ControlKey>>,
    /// Controls reading each field id.
    pub by_input_field: IndexMap<FieldId, Vec<ControlKey>>,
    /// Controls writing each field id.
    pub by_output_field: IndexMap<FieldId, Vec<ControlKey>>,
}

impl ControlIndex {
    /// Build the index from a working set in one pass.
    ///
    /// Reverse-index lists are duplicate-free; a control key appears at
    /// most once per id even when two records share the key. A control
    /// referencing an id as both input and output lands in both field
    /// indexes independently.
    pub fn build(controls: &[Control]) -> Self {
        let normalizer = ReferenceNormalizer::new();
        let mut index = ControlIndex::default();

        for control in controls {
            let key = control.key();
            let references = control.normalized_references(&normalizer);

            for event_id in &references.triggers {
                push_unique(index.by_event.entry(event_id.clone()).or_default(), &key);
            }
            for field_id in &references.inputs {
                push_unique(
                    index.by_input_field.entry(field_id.clone()).or_default(),
                    &key,
                );
            }
            for field_id in &references.outputs {
                push_unique(
                    index.by_output_field.entry(field_id.clone()).or_default(),
                    &key,
                );
            }

            index
                .entries
                .insert(key, ControlEntry::project(control, references));
        }

        index
    }
}

fn push_unique(list: &mut Vec<ControlKey>, key: &ControlKey) {
    if !list.contains(key) {
        list.push(key.clone());
    }
}

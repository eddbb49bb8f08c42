//! # Control Records
//!
//! The authored side of the pipeline: compliance controls as the legal
//! team writes them, with loosely formatted references into the event
//! and field vocabulary.
//!
//! ## Data Model
//!
//! - [`Control`]: one authored control record (the input document shape).
//! - [`ControlSet`]: the `controls` working-set document.
//! - [`NormalizedReferences`]: a control's trigger/input/output references
//!   after canonicalization and per-control deduplication.
//!
//! Every field except `id` is optional in the input; absent values
//! default to empty. Tolerance is deliberate: a half-written control must
//! still flow through the pipeline and show up in the manifest, where the
//! registry annotations make its gaps visible.

use controls_core::{ControlKey, EventId, FieldId, ReferenceNormalizer};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A compliance control record as authored.
///
/// Maps a regulatory obligation to the system events that trigger it,
/// the data fields it reads and writes, and the audit events it must
/// emit. Reference fields (`triggers`, `inputs`, `outputs`) hold raw
/// strings that may mix canonical ids with prose; they are normalized at
/// build time, never at rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Short control code, e.g. `CA-01`.
    pub id: String,
    /// Human-readable control name.
    #[serde(default)]
    pub name: String,
    /// Source document the control was authored in.
    #[serde(default)]
    pub source_file: String,
    /// Authored global key; when empty the key derives from
    /// `source_file` and `id`.
    #[serde(default)]
    pub scoped_id: String,
    /// What the control exists to ensure.
    #[serde(default)]
    pub purpose: String,
    /// Ordered regulation citations this control implements.
    #[serde(default)]
    pub primary_rules: Vec<String>,
    /// Raw event references that trigger the control.
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Raw field references the control reads.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Raw field references the control writes.
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Literal audit event names the control must emit.
    #[serde(default)]
    pub audit_logs: Vec<String>,

    // Narrative fields, opaque to the pipeline. They are kept on the
    // record for authoring round-trips and dropped from manifest entries.
    /// Narrative: expected system behavior.
    #[serde(default)]
    pub system_behavior: String,
    /// Narrative: edge cases the control must handle.
    #[serde(default)]
    pub edge_cases: String,
    /// Narrative: who may act on or override the control.
    #[serde(default)]
    pub access_control: String,
    /// Narrative: alerting and metrics expectations.
    #[serde(default)]
    pub alerts_metrics: String,
    /// Narrative: deadlines and SLA notes.
    #[serde(default)]
    pub timers_slas: String,
    /// Authoring metadata: anchor of the source-document section.
    #[serde(default)]
    pub anchor: String,
    /// Authoring metadata: rationale for the regulation citations.
    #[serde(default)]
    pub why_reg_cite: String,
}

/// A control's references after normalization.
///
/// Each list is canonical, insertion-ordered, and deduplicated within
/// the control (first occurrence wins). References that failed to
/// normalize are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedReferences {
    /// Canonical event ids extracted from `triggers`.
    pub triggers: Vec<EventId>,
    /// Canonical field ids extracted from `inputs`.
    pub inputs: Vec<FieldId>,
    /// Canonical field ids extracted from `outputs`.
    pub outputs: Vec<FieldId>,
}

impl Control {
    /// The globally unique key of this control: the authored
    /// `scoped_id`, or `{source_file|unknown}:{id}` when absent.
    pub fn key(&self) -> ControlKey {
        if self.scoped_id.is_empty() {
            ControlKey::scoped(&self.source_file, &self.id)
        } else {
            ControlKey::new(self.scoped_id.clone())
        }
    }

    /// Normalize this control's raw references.
    ///
    /// References that do not normalize are dropped and logged at debug
    /// level; a malformed reference is a data-quality signal for the
    /// registries, not an error.
    pub fn normalized_references(&self, normalizer: &ReferenceNormalizer) -> NormalizedReferences {
        let key = self.key();

        let triggers: Vec<EventId> = self
            .triggers
            .iter()
            .filter_map(|raw| {
                let id = normalizer.event_id(raw);
                if id.is_none() && !raw.trim().is_empty() {
                    tracing::debug!(control = %key, raw = %raw, "trigger reference did not normalize");
                }
                id
            })
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        NormalizedReferences {
            triggers,
            inputs: normalized_field_refs(&self.inputs, normalizer, &key, "input"),
            outputs: normalized_field_refs(&self.outputs, normalizer, &key, "output"),
        }
    }
}

fn normalized_field_refs(
    raws: &[String],
    normalizer: &ReferenceNormalizer,
    key: &ControlKey,
    role: &str,
) -> Vec<FieldId> {
    let mut out: IndexSet<FieldId> = IndexSet::new();
    for raw in raws {
        let ids = normalizer.field_ids(raw);
        if ids.is_empty() && !raw.trim().is_empty() {
            tracing::debug!(control = %key, role, raw = %raw, "field reference did not normalize");
        }
        out.extend(ids);
    }
    out.into_iter().collect()
}

/// The `controls` input document: a working set of authored controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSet {
    /// Controls in authoring order.
    #[serde(default)]
    pub controls: Vec<Control>,
}

impl ControlSet {
    /// Find a control whose `scoped_id` matches, falling back to a
    /// match on `id`.
    pub fn find(&self, wanted: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|c| c.scoped_id == wanted)
            .or_else(|| self.controls.iter().find(|c| c.id == wanted))
    }
}

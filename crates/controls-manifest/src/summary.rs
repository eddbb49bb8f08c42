//! Aggregate counts over a built manifest, plus the list of control
//! source files that contributed.

use controls_core::{ControlKey, EventId, FieldId};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::control::Control;
use crate::index::ControlEntry;
use crate::registry::{EventEntry, FieldEntry};

/// Roll-up statistics for a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSummary {
    /// Number of control entries (after duplicate-key collapse).
    pub total_controls: usize,
    /// Number of distinct event ids in the event registry.
    pub total_events_required: usize,
    /// Number of distinct field ids in the field registry.
    pub total_fields_required: usize,
    /// Events present in the controlled vocabulary.
    pub registered_events: usize,
    /// Events referenced by controls but absent from the vocabulary.
    pub unregistered_events: usize,
    /// Fields present in the controlled vocabulary.
    pub registered_fields: usize,
    /// Fields referenced by controls but absent from the vocabulary.
    pub unregistered_fields: usize,
    /// Distinct source files, in first-control order.
    pub source_files: Vec<String>,
}

impl ManifestSummary {
    /// Compute summary statistics from the built registries.
    pub fn compute(
        controls: &[Control],
        entries: &IndexMap<ControlKey, ControlEntry>,
        events: &IndexMap<EventId, EventEntry>,
        fields: &IndexMap<FieldId, FieldEntry>,
    ) -> Self {
        let registered_events = events.values().filter(|e| e.registered).count();
        let registered_fields = fields.values().filter(|f| f.registered).count();

        let source_files: IndexSet<String> = controls
            .iter()
            .map(|c| c.source_file.clone())
            .filter(|s| !s.is_empty())
            .collect();

        ManifestSummary {
            total_controls: entries.len(),
            total_events_required: events.len(),
            total_fields_required: fields.len(),
            registered_events,
            unregistered_events: events.len() - registered_events,
            registered_fields,
            unregistered_fields: fields.len() - registered_fields,
            source_files: source_files.into_iter().collect(),
        }
    }
}

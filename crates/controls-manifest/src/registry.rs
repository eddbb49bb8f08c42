//! # Event & Field Registries
//!
//! The reconciliation step: every id referenced by a control or declared
//! in the vocabulary gets exactly one registry entry stating whether it
//! is registered and which controls depend on it.
//!
//! ## Enumeration Order
//!
//! Registries enumerate the union of referenced and registered ids,
//! referenced ids first (in first-reference order), then the remaining
//! vocabulary ids (in vocabulary order). An id registered but never
//! referenced still appears, with empty control lists: the registry
//! describes the whole vocabulary surface, not just what is in use.
//!
//! ## Bracket Normalization
//!
//! Vocabulary field paths may carry trailing `[]` array markers. They
//! are stripped before matching so `cda.glossary.items[]` and a control
//! reference to `cda.glossary.items` resolve to one entry.

use controls_core::{ControlKey, EventId, FieldId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vocabulary::{FieldDef, Vocabulary};

/// A reconciled event: vocabulary data when registered, placeholder
/// nulls when not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Vocabulary description, or `null` when unregistered.
    pub description: Option<String>,
    /// Vocabulary category, or the id's prefix when unregistered.
    pub category: String,
    /// Whether the id exists in the controlled vocabulary.
    pub registered: bool,
    /// Controls triggered by this event, in reference order.
    pub required_by_controls: Vec<ControlKey>,
}

/// A reconciled field: vocabulary data when registered, placeholder
/// nulls when not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Vocabulary type, or `null` when unregistered.
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    /// Vocabulary description, or `null` when unregistered.
    pub description: Option<String>,
    /// Vocabulary category, or the id's prefix when unregistered.
    pub category: String,
    /// PII flag when registered; `null` when the vocabulary cannot say.
    pub pii: Option<bool>,
    /// Whether the id exists in the controlled vocabulary.
    pub registered: bool,
    /// Controls reading this field, in reference order.
    pub used_as_input_by: Vec<ControlKey>,
    /// Controls writing this field, in reference order.
    pub used_as_output_by: Vec<ControlKey>,
}

/// Build the event registry: the union of referenced and registered
/// event ids.
pub fn build_event_registry(
    vocabulary: &Vocabulary,
    by_event: &IndexMap<EventId, Vec<ControlKey>>,
) -> IndexMap<EventId, EventEntry> {
    let mut registry = IndexMap::new();

    for event_id in by_event.keys().chain(vocabulary.events.keys()) {
        if registry.contains_key(event_id) {
            continue;
        }
        let def = vocabulary.events.get(event_id);
        registry.insert(
            event_id.clone(),
            EventEntry {
                description: def.and_then(|d| d.description.clone()),
                category: def
                    .map(|d| d.category.clone())
                    .unwrap_or_else(|| event_id.category().to_string()),
                registered: def.is_some(),
                required_by_controls: by_event.get(event_id).cloned().unwrap_or_default(),
            },
        );
    }

    registry
}

/// Build the field registry: the union of referenced and registered
/// field ids, with vocabulary paths bracket-normalized for matching.
pub fn build_field_registry(
    vocabulary: &Vocabulary,
    by_input_field: &IndexMap<FieldId, Vec<ControlKey>>,
    by_output_field: &IndexMap<FieldId, Vec<ControlKey>>,
) -> IndexMap<FieldId, FieldEntry> {
    // Last definition wins when two vocabulary paths normalize to the
    // same id; the first position is kept.
    let mut vocab_normalized: IndexMap<FieldId, &FieldDef> = IndexMap::new();
    for (path, def) in &vocabulary.fields {
        vocab_normalized.insert(FieldId::new(path.replace("[]", "")), def);
    }

    let mut registry = IndexMap::new();

    for field_id in by_input_field
        .keys()
        .chain(by_output_field.keys())
        .chain(vocab_normalized.keys())
    {
        if registry.contains_key(field_id) {
            continue;
        }
        let def = vocab_normalized.get(field_id).copied();
        registry.insert(
            field_id.clone(),
            FieldEntry {
                field_type: def.map(|d| d.field_type.clone()),
                description: def.and_then(|d| d.description.clone()),
                category: def
                    .map(|d| d.category.clone())
                    .unwrap_or_else(|| field_id.category().to_string()),
                pii: def.map(|d| d.pii),
                registered: def.is_some(),
                used_as_input_by: by_input_field.get(field_id).cloned().unwrap_or_default(),
                used_as_output_by: by_output_field.get(field_id).cloned().unwrap_or_default(),
            },
        );
    }

    registry
}

//! # Controlled Vocabulary
//!
//! The read-only side of the pipeline: the event, field, and regulation
//! definitions that controls are reconciled against, plus the opaque
//! blocks (`sla_patterns`, `roles`, `audit_suffixes`) that pass through
//! to the manifest verbatim.
//!
//! ## Data Model
//!
//! - [`Vocabulary`]: the adapted vocabulary a build consumes.
//! - [`EventDef`]: a registered event (description plus category).
//! - [`FieldDef`]: a registered field (type, description, category, pii).
//! - [`RegulationDef`]: a known regulation (citation plus display name).
//!
//! Field definitions are keyed by their raw vocabulary path, which may
//! carry trailing `[]` array markers (`cda.glossary.items[]`). Matching
//! against control references strips those markers; the registry builder
//! owns that normalization, not this module.
//!
//! An absent vocabulary is the empty [`Vocabulary::default`], never an
//! error: every control reference then resolves as unregistered.

use controls_core::EventId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A registered event definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    /// Human description, when the vocabulary carries one.
    #[serde(default)]
    pub description: Option<String>,
    /// Grouping category; by convention the event name's prefix.
    pub category: String,
}

/// A registered field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Declared data type, e.g. `string`, `number`, `boolean`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Human description, when the vocabulary carries one.
    #[serde(default)]
    pub description: Option<String>,
    /// Grouping category; by convention the owning entity.
    pub category: String,
    /// Whether the field carries personally identifiable information.
    #[serde(default)]
    pub pii: bool,
}

/// A known regulation: official citation plus display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationDef {
    /// Official citation string, e.g. `12 CFR §721.3`.
    pub citation: String,
    /// Display name, e.g. `NCUA CDA Regulation`.
    pub name: String,
}

/// The adapted controlled vocabulary a manifest build reads.
///
/// Built by [`adapt_vocabulary`](crate::adapter::adapt_vocabulary) from
/// the parser document and the static block, or constructed directly in
/// tests. Insertion order of every map is preserved into the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// Registered events keyed by canonical id.
    pub events: IndexMap<EventId, EventDef>,
    /// Registered fields keyed by raw vocabulary path (may carry `[]`).
    pub fields: IndexMap<String, FieldDef>,
    /// Known regulations keyed by internal vocabulary key.
    pub regulations: IndexMap<String, RegulationDef>,
    /// SLA pattern definitions, copied into the manifest verbatim.
    pub sla_patterns: serde_yaml::Value,
    /// Role identifiers available to control authors.
    pub roles: Vec<String>,
    /// Audit event name suffixes.
    pub audit_suffixes: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            events: IndexMap::new(),
            fields: IndexMap::new(),
            regulations: IndexMap::new(),
            sla_patterns: empty_mapping(),
            roles: Vec::new(),
            audit_suffixes: Vec::new(),
        }
    }
}

/// An empty YAML mapping, the value opaque blocks default to so the
/// manifest renders `{}` rather than `null`.
pub(crate) fn empty_mapping() -> serde_yaml::Value {
    serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
}

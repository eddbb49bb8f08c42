//! # Vocabulary Adapter
//!
//! Turns the vocabulary parser's output document (`vocabulary.json`,
//! events and fields as arrays) plus the hand-maintained static block
//! into the keyed [`Vocabulary`] the pipeline consumes.
//!
//! The parser document carries more than the manifest needs (entity
//! schemas, endpoint inventories, extraction stats, per-field encryption
//! and retention attributes); only the attributes the registries read
//! survive adaptation. Empty strings in the source are treated as absent,
//! matching how authoring tools leave blanks behind.

use controls_core::EventId;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::vocabulary::{empty_mapping, EventDef, FieldDef, RegulationDef, Vocabulary};

/// One event as the vocabulary parser emits it.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedEvent {
    /// Canonical event name, e.g. `member.created`.
    pub name: String,
    /// Human description.
    #[serde(default)]
    pub description: Option<String>,
}

/// One field as the vocabulary parser emits it.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedField {
    /// Dotted field path; may carry trailing `[]` array markers.
    pub path: String,
    /// Declared data type; defaults to `string`.
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    /// Human description.
    #[serde(default)]
    pub description: Option<String>,
    /// Declared grouping category.
    #[serde(default)]
    pub category: Option<String>,
    /// Owning entity, the category fallback.
    #[serde(default)]
    pub entity: Option<String>,
    /// Whether the field carries personally identifiable information.
    #[serde(default)]
    pub pii: bool,
}

/// The vocabulary parser's output document.
///
/// Only `events` and `fields` feed the pipeline; the parser's other
/// sections are ignored on load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabularyDocument {
    /// Events extracted from the API specification.
    #[serde(default)]
    pub events: Vec<ParsedEvent>,
    /// Fields extracted from the API specification.
    #[serde(default)]
    pub fields: Vec<ParsedField>,
}

/// Hand-maintained vocabulary data that is not derived from the API
/// specification: SLA patterns, regulation citations, roles, and audit
/// naming conventions.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticVocabulary {
    /// SLA pattern definitions, copied into the manifest verbatim.
    #[serde(default = "empty_mapping")]
    pub sla_patterns: serde_yaml::Value,
    /// Known regulations keyed by internal vocabulary key.
    #[serde(default)]
    pub regulations: IndexMap<String, RegulationDef>,
    /// Role identifiers available to control authors.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Audit event name suffixes.
    #[serde(default)]
    pub audit_suffixes: Vec<String>,
}

impl Default for StaticVocabulary {
    fn default() -> Self {
        Self {
            sla_patterns: empty_mapping(),
            regulations: IndexMap::new(),
            roles: Vec::new(),
            audit_suffixes: Vec::new(),
        }
    }
}

/// Combine the parser document and the static block into the adapted
/// vocabulary.
///
/// Events are keyed by name with the category derived from the name
/// prefix. Fields are keyed by path with `type` defaulting to `string`
/// and category falling back from the declared category to the owning
/// entity to `other`. Duplicate names keep their first position; the
/// later definition wins.
pub fn adapt_vocabulary(document: VocabularyDocument, static_data: StaticVocabulary) -> Vocabulary {
    let mut events = IndexMap::new();
    for event in document.events {
        let id = EventId::new(event.name);
        let category = id.category().to_string();
        events.insert(
            id,
            EventDef {
                description: non_empty(event.description),
                category,
            },
        );
    }

    let mut fields = IndexMap::new();
    for field in document.fields {
        fields.insert(
            field.path,
            FieldDef {
                field_type: non_empty(field.field_type).unwrap_or_else(|| "string".to_string()),
                description: non_empty(field.description),
                category: non_empty(field.category)
                    .or_else(|| non_empty(field.entity))
                    .unwrap_or_else(|| "other".to_string()),
                pii: field.pii,
            },
        );
    }

    Vocabulary {
        events,
        fields,
        regulations: static_data.regulations,
        sla_patterns: match static_data.sla_patterns {
            serde_yaml::Value::Null => empty_mapping(),
            other => other,
        },
        roles: static_data.roles,
        audit_suffixes: static_data.audit_suffixes,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> VocabularyDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn events_are_keyed_by_name_with_prefix_category() {
        let doc = document(
            r#"{"events": [
                {"name": "member.created", "description": "A member joins"},
                {"name": "governance.policy_version_approved"}
            ]}"#,
        );
        let vocab = adapt_vocabulary(doc, StaticVocabulary::default());

        let member = &vocab.events[&EventId::new("member.created")];
        assert_eq!(member.description.as_deref(), Some("A member joins"));
        assert_eq!(member.category, "member");

        let governance = &vocab.events[&EventId::new("governance.policy_version_approved")];
        assert_eq!(governance.description, None);
        assert_eq!(governance.category, "governance");
    }

    #[test]
    fn empty_description_becomes_absent() {
        let doc = document(r#"{"events": [{"name": "member.created", "description": ""}]}"#);
        let vocab = adapt_vocabulary(doc, StaticVocabulary::default());
        assert_eq!(vocab.events[&EventId::new("member.created")].description, None);
    }

    #[test]
    fn fields_get_type_and_category_fallbacks() {
        let doc = document(
            r#"{"fields": [
                {"path": "decision.outcome", "type": "enum", "category": "decision"},
                {"path": "member.ssn", "entity": "member", "pii": true},
                {"path": "misc.note"}
            ]}"#,
        );
        let vocab = adapt_vocabulary(doc, StaticVocabulary::default());

        assert_eq!(vocab.fields["decision.outcome"].field_type, "enum");
        assert_eq!(vocab.fields["decision.outcome"].category, "decision");
        assert!(!vocab.fields["decision.outcome"].pii);

        assert_eq!(vocab.fields["member.ssn"].field_type, "string");
        assert_eq!(vocab.fields["member.ssn"].category, "member");
        assert!(vocab.fields["member.ssn"].pii);

        assert_eq!(vocab.fields["misc.note"].category, "other");
    }

    #[test]
    fn array_marker_paths_are_kept_raw() {
        let doc = document(r#"{"fields": [{"path": "cda.glossary.items[]"}]}"#);
        let vocab = adapt_vocabulary(doc, StaticVocabulary::default());
        assert!(vocab.fields.contains_key("cda.glossary.items[]"));
    }

    #[test]
    fn duplicate_names_keep_position_last_definition_wins() {
        let doc = document(
            r#"{"events": [
                {"name": "member.created", "description": "first"},
                {"name": "member.closed"},
                {"name": "member.created", "description": "second"}
            ]}"#,
        );
        let vocab = adapt_vocabulary(doc, StaticVocabulary::default());

        let keys: Vec<&str> = vocab.events.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["member.created", "member.closed"]);
        assert_eq!(
            vocab.events[&EventId::new("member.created")].description.as_deref(),
            Some("second")
        );
    }

    #[test]
    fn static_block_passes_through() {
        let static_data: StaticVocabulary = serde_yaml::from_str(
            r#"
sla_patterns:
  calendar_days:
    description: N calendar days from trigger
regulations:
  12_cfr_721.3:
    citation: "12 CFR §721.3"
    name: "NCUA CDA Regulation"
roles: [compliance_officer, board]
audit_suffixes: [".created", ".approved"]
"#,
        )
        .unwrap();

        let vocab = adapt_vocabulary(VocabularyDocument::default(), static_data);
        assert_eq!(vocab.regulations["12_cfr_721.3"].citation, "12 CFR §721.3");
        assert_eq!(vocab.roles, vec!["compliance_officer", "board"]);
        assert_eq!(vocab.audit_suffixes, vec![".created", ".approved"]);
        assert!(vocab.sla_patterns.get("calendar_days").is_some());
    }

    #[test]
    fn null_sla_patterns_becomes_empty_mapping() {
        let static_data: StaticVocabulary =
            serde_yaml::from_str("sla_patterns: null\n").unwrap();
        let vocab = adapt_vocabulary(VocabularyDocument::default(), static_data);
        assert_eq!(vocab.sla_patterns, empty_mapping());
    }
}

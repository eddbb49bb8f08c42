//! End-to-end tests over the manifest pipeline: control and vocabulary
//! documents in, deterministic YAML out.
//!
//! Exercises reference normalization, registry reconciliation,
//! regulation matching, and byte-level output stability together, plus
//! the export subcommand against real files.

use controls_core::{ControlKey, EventId, FieldId, ReferenceNormalizer, Timestamp};
use controls_manifest::{
    adapt_vocabulary, ControlSet, Manifest, StaticVocabulary, Vocabulary, VocabularyDocument,
};
use proptest::prelude::*;

const WORKING_SET: &str = r#"
controls:
  - id: CDA-LIMIT-01
    name: CDA Internal Buffer Enforcement
    source_file: cda-controls.md
    purpose: Stop disbursements before the statutory aggregate limit.
    primary_rules:
      - 12 CFR §721.3(b)(2)
      - Internal Lending Policy 4.1
    triggers:
      - Disbursement request submitted (cda.disbursement_requested)
      - cda.limit_recalculated
    inputs:
      - (cda.limit.internal_buffer = 4%)
      - cda.glossary.items
      - member.industry in {{High_Risk_Industries_List}}
    outputs:
      - decision.outcome
      - decision.date
    audit_logs:
      - cda_limit_check.evaluated
  - id: GOV-VER-02
    name: Policy Version Approval
    source_file: governance-controls.md
    purpose: Require board approval for policy version changes.
    primary_rules:
      - Internal Lending Policy 4.1
    triggers:
      - Board approves new version (governance.policy_version_approved)
    inputs:
      - decision.outcome
    outputs:
      - governance.policy_version
"#;

const VOCABULARY_DOCUMENT: &str = r#"{
  "events": [
    {"name": "cda.disbursement_requested", "description": "Disbursement request received"},
    {"name": "governance.policy_version_approved"},
    {"name": "member.created", "description": "Never referenced by these controls"}
  ],
  "fields": [
    {"path": "cda.glossary.items[]", "type": "array", "category": "cda"},
    {"path": "decision.outcome", "type": "enum", "category": "decision"},
    {"path": "member.ssn", "type": "string", "entity": "member", "pii": true}
  ]
}"#;

const STATIC_VOCABULARY: &str = r#"
sla_patterns:
  calendar_days:
    description: N calendar days from the trigger event
regulations:
  ncua_cda:
    citation: "12 CFR §721.3"
    name: "NCUA Charitable Donation Accounts"
roles:
  - compliance_officer
audit_suffixes:
  - .evaluated
"#;

fn timestamp() -> Timestamp {
    Timestamp::parse_rfc3339("2026-01-15T12:00:00Z").unwrap()
}

fn working_set() -> ControlSet {
    serde_yaml::from_str(WORKING_SET).unwrap()
}

fn vocabulary() -> Vocabulary {
    let document: VocabularyDocument = serde_json::from_str(VOCABULARY_DOCUMENT).unwrap();
    let static_data: StaticVocabulary = serde_yaml::from_str(STATIC_VOCABULARY).unwrap();
    adapt_vocabulary(document, static_data)
}

fn build() -> Manifest {
    Manifest::build(&working_set(), &vocabulary(), timestamp())
}

// ---------------------------------------------------------------------------
// Reference normalization, exact behaviours
// ---------------------------------------------------------------------------

#[test]
fn bare_references_pass_through() {
    let normalizer = ReferenceNormalizer::new();
    assert_eq!(
        normalizer.event_id("member.created"),
        Some(EventId::new("member.created"))
    );
    assert_eq!(
        normalizer.field_ids("decision.outcome, decision.date"),
        vec![
            FieldId::new("decision.outcome"),
            FieldId::new("decision.date")
        ]
    );
}

#[test]
fn parenthesized_event_is_extracted_from_narrative() {
    let normalizer = ReferenceNormalizer::new();
    assert_eq!(
        normalizer.event_id("Board approves new version (governance.policy_version_approved)"),
        Some(EventId::new("governance.policy_version_approved"))
    );
}

#[test]
fn non_canonical_references_are_rejected() {
    let normalizer = ReferenceNormalizer::new();
    assert_eq!(
        normalizer.event_id("(member.industry in {{High_Risk_Industries_List}})"),
        None
    );
    assert!(normalizer.field_ids("UST").is_empty());
}

#[test]
fn comparator_suffix_is_stripped_from_field_references() {
    let normalizer = ReferenceNormalizer::new();
    assert_eq!(
        normalizer.field_ids("(cda.limit.internal_buffer = 4%)"),
        vec![FieldId::new("cda.limit.internal_buffer")]
    );
}

// ---------------------------------------------------------------------------
// Deterministic rendering
// ---------------------------------------------------------------------------

#[test]
fn same_inputs_same_timestamp_render_byte_identical() {
    let first = build().to_yaml().unwrap();
    let second = build().to_yaml().unwrap();
    assert_eq!(first, second, "pinned-timestamp builds must not differ");
}

#[test]
fn top_level_key_order_is_fixed() {
    let expected = vec![
        "version",
        "generated_at",
        "generator",
        "controls",
        "events",
        "fields",
        "regulations",
        "sla_patterns",
        "roles",
        "audit_suffixes",
        "summary",
    ];

    let yaml = build().to_yaml().unwrap();
    assert_eq!(top_level_keys(&yaml), expected);

    // Reversing the control order must not touch the document skeleton.
    let mut reversed = working_set();
    reversed.controls.reverse();
    let yaml = Manifest::build(&reversed, &vocabulary(), timestamp())
        .to_yaml()
        .unwrap();
    assert_eq!(top_level_keys(&yaml), expected);
}

fn top_level_keys(yaml: &str) -> Vec<String> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
    value
        .as_mapping()
        .unwrap()
        .keys()
        .map(|k| k.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn rendered_manifest_parses_back() {
    let manifest = build();
    let parsed: Manifest = serde_yaml::from_str(&manifest.to_yaml().unwrap()).unwrap();

    assert_eq!(parsed.generated_at, manifest.generated_at);
    assert_eq!(
        parsed.controls.keys().collect::<Vec<_>>(),
        manifest.controls.keys().collect::<Vec<_>>()
    );
    assert_eq!(parsed.summary, manifest.summary);
}

// ---------------------------------------------------------------------------
// Registry reconciliation
// ---------------------------------------------------------------------------

#[test]
fn control_entries_are_keyed_and_normalized() {
    let manifest = build();
    let entry = &manifest.controls[&ControlKey::new("cda-controls.md:CDA-LIMIT-01")];

    assert_eq!(
        entry.triggers,
        vec![
            EventId::new("cda.disbursement_requested"),
            EventId::new("cda.limit_recalculated")
        ]
    );
    assert_eq!(
        entry.inputs,
        vec![
            FieldId::new("cda.limit.internal_buffer"),
            FieldId::new("cda.glossary.items")
        ],
        "rejected references must not reach the entry"
    );
    assert_eq!(
        entry.outputs,
        vec![FieldId::new("decision.outcome"), FieldId::new("decision.date")]
    );
}

#[test]
fn reverse_indexes_are_complete_in_both_directions() {
    let manifest = build();

    for (key, entry) in &manifest.controls {
        for trigger in &entry.triggers {
            assert!(
                manifest.events[trigger].required_by_controls.contains(key),
                "event {trigger} missing control {key}"
            );
        }
        for input in &entry.inputs {
            assert!(
                manifest.fields[input].used_as_input_by.contains(key),
                "input {input} missing control {key}"
            );
        }
        for output in &entry.outputs {
            assert!(
                manifest.fields[output].used_as_output_by.contains(key),
                "output {output} missing control {key}"
            );
        }
    }

    for (event_id, entry) in &manifest.events {
        for key in &entry.required_by_controls {
            assert!(
                manifest.controls[key].triggers.contains(event_id),
                "control {key} does not trigger on {event_id}"
            );
        }
    }
}

#[test]
fn bracketed_vocabulary_path_shares_entry_with_bare_reference() {
    let manifest = build();

    let entry = &manifest.fields[&FieldId::new("cda.glossary.items")];
    assert!(entry.registered);
    assert_eq!(entry.field_type.as_deref(), Some("array"));
    assert_eq!(
        entry.used_as_input_by,
        vec![ControlKey::new("cda-controls.md:CDA-LIMIT-01")]
    );
    assert!(!manifest.fields.contains_key(&FieldId::new("cda.glossary.items[]")));
}

#[test]
fn registered_but_unreferenced_ids_keep_empty_control_lists() {
    let manifest = build();

    let event = &manifest.events[&EventId::new("member.created")];
    assert!(event.registered);
    assert!(event.required_by_controls.is_empty());

    let field = &manifest.fields[&FieldId::new("member.ssn")];
    assert!(field.registered);
    assert_eq!(field.pii, Some(true));
    assert!(field.used_as_input_by.is_empty());
    assert!(field.used_as_output_by.is_empty());
}

#[test]
fn unregistered_references_are_flagged_not_dropped() {
    let manifest = build();

    let event = &manifest.events[&EventId::new("cda.limit_recalculated")];
    assert!(!event.registered);
    assert_eq!(event.category, "cda");

    let field = &manifest.fields[&FieldId::new("governance.policy_version")];
    assert!(!field.registered);
    assert_eq!(field.field_type, None);
    assert_eq!(field.pii, None);
}

// ---------------------------------------------------------------------------
// Regulation matching
// ---------------------------------------------------------------------------

#[test]
fn subsection_rule_lands_on_canonical_citation() {
    let manifest = build();

    let entry = &manifest.regulations["12 CFR §721.3"];
    assert_eq!(entry.vocabulary_key.as_deref(), Some("ncua_cda"));
    assert_eq!(
        entry.referenced_by_controls,
        vec![ControlKey::new("cda-controls.md:CDA-LIMIT-01")]
    );
    assert!(
        !manifest.regulations.contains_key("12 CFR §721.3(b)(2)"),
        "subsection rule must not open its own entry"
    );
}

#[test]
fn unmatched_rule_opens_one_ad_hoc_entry() {
    let manifest = build();

    let entry = &manifest.regulations["Internal Lending Policy 4.1"];
    assert_eq!(entry.vocabulary_key, None);
    assert_eq!(entry.name, None);
    assert_eq!(
        entry.referenced_by_controls,
        vec![
            ControlKey::new("cda-controls.md:CDA-LIMIT-01"),
            ControlKey::new("governance-controls.md:GOV-VER-02")
        ]
    );

    let yaml = manifest.to_yaml().unwrap();
    assert!(yaml.contains("vocabulary_key: null"));
}

// ---------------------------------------------------------------------------
// Summary consistency
// ---------------------------------------------------------------------------

#[test]
fn summary_totals_match_registry_sizes() {
    let manifest = build();
    let summary = &manifest.summary;

    assert_eq!(summary.total_controls, manifest.controls.len());
    assert_eq!(summary.total_events_required, manifest.events.len());
    assert_eq!(summary.total_fields_required, manifest.fields.len());
    assert_eq!(
        summary.registered_events + summary.unregistered_events,
        summary.total_events_required
    );
    assert_eq!(
        summary.registered_fields + summary.unregistered_fields,
        summary.total_fields_required
    );
    assert_eq!(
        summary.source_files,
        vec!["cda-controls.md", "governance-controls.md"]
    );
}

// ---------------------------------------------------------------------------
// Export subcommand over real files
// ---------------------------------------------------------------------------

#[test]
fn export_then_check_round_trips_on_disk() {
    use controls_cli::export::{run_export, ExportArgs};

    let dir = tempfile::tempdir().unwrap();
    let controls_path = dir.path().join("controls.yaml");
    let vocabulary_path = dir.path().join("vocabulary.json");
    let static_path = dir.path().join("static.yaml");
    let out_path = dir.path().join("manifest.yaml");

    std::fs::write(&controls_path, WORKING_SET).unwrap();
    std::fs::write(&vocabulary_path, VOCABULARY_DOCUMENT).unwrap();
    std::fs::write(&static_path, STATIC_VOCABULARY).unwrap();

    let write_args = ExportArgs {
        controls: controls_path.clone(),
        vocabulary: Some(vocabulary_path.clone()),
        static_vocabulary: Some(static_path.clone()),
        out: Some(out_path.clone()),
        generated_at: Some("2026-01-15T12:00:00Z".to_string()),
        check: false,
    };
    assert_eq!(run_export(&write_args).unwrap(), 0);

    let on_disk = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(on_disk, build().to_yaml().unwrap());

    let check_args = ExportArgs {
        controls: controls_path.clone(),
        vocabulary: Some(vocabulary_path.clone()),
        static_vocabulary: Some(static_path.clone()),
        out: Some(out_path.clone()),
        generated_at: None,
        check: true,
    };
    assert_eq!(run_export(&check_args).unwrap(), 0);

    // Drift the working set; the check must now fail.
    std::fs::write(
        &controls_path,
        WORKING_SET.replace("decision.outcome", "decision.verdict"),
    )
    .unwrap();
    assert_eq!(run_export(&check_args).unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Idempotence over arbitrary reference sets
// ---------------------------------------------------------------------------

proptest! {
    /// Two builds over the same generated control set render the same
    /// bytes, whatever the references look like.
    #[test]
    fn arbitrary_control_sets_render_identically(
        ids in proptest::collection::vec("[a-z][a-z0-9_]{0,8}\\.[a-z][a-z0-9_]{0,8}", 0..6)
    ) {
        let set = ControlSet {
            controls: ids
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    serde_yaml::from_str(&format!(
                        "id: CA-{i:02}\nsource_file: generated.md\ntriggers: [{id}]\ninputs: [{id}]\n"
                    ))
                    .unwrap()
                })
                .collect(),
        };

        let first = Manifest::build(&set, &vocabulary(), timestamp()).to_yaml().unwrap();
        let second = Manifest::build(&set, &vocabulary(), timestamp()).to_yaml().unwrap();
        prop_assert_eq!(first, second);
    }
}

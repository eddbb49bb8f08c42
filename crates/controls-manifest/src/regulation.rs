//! # Regulation Registry
//!
//! Maps regulatory citations to the controls that cite them. Controls
//! cite regulations as free-text rule strings ("12 CFR §1020.220(a)");
//! the vocabulary carries canonical citations. Matching is substring
//! containment in either direction, so a rule quoting a subsection
//! still lands on the canonical parent citation.
//!
//! ## Live Matching
//!
//! The registry starts seeded with the vocabulary citations and grows
//! as unmatched rules arrive: a rule with no match becomes an ad-hoc
//! entry keyed by its own raw text, and later rules can match against
//! it. First match in registry insertion order wins, which means the
//! outcome for a given rule can depend on the rules processed before
//! it. That mirrors how reviewers accrete citations: the first spelling
//! to appear becomes the bucket for every later variant.

use std::collections::HashSet;

use controls_core::ControlKey;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::control::Control;
use crate::vocabulary::Vocabulary;

/// One citation bucket: a vocabulary-backed citation or an ad-hoc rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationEntry {
    /// Internal vocabulary key, or `null` for ad-hoc entries.
    pub vocabulary_key: Option<String>,
    /// Human-readable regulation name, or `null` for ad-hoc entries.
    pub name: Option<String>,
    /// Controls citing this regulation, duplicate-free.
    pub referenced_by_controls: Vec<ControlKey>,
}

/// Build the regulation registry by matching every control's primary
/// rules against the live set of citations.
pub fn build_regulation_registry(
    controls: &[Control],
    vocabulary: &Vocabulary,
) -> IndexMap<String, RegulationEntry> {
    let mut registry: IndexMap<String, RegulationEntry> = IndexMap::new();
    for (internal_key, def) in &vocabulary.regulations {
        registry.insert(
            def.citation.clone(),
            RegulationEntry {
                vocabulary_key: Some(internal_key.clone()),
                name: Some(def.name.clone()),
                referenced_by_controls: Vec::new(),
            },
        );
    }

    for control in controls {
        let key = control.key();
        for rule in &control.primary_rules {
            let position = registry
                .keys()
                .position(|citation| rule.contains(citation.as_str()) || citation.contains(rule.as_str()));
            match position {
                Some(index) => {
                    if let Some((_, entry)) = registry.get_index_mut(index) {
                        entry.referenced_by_controls.push(key.clone());
                    }
                }
                None => {
                    tracing::debug!(rule = %rule, control = %key, "rule matched no citation, adding ad-hoc entry");
                    registry
                        .entry(rule.clone())
                        .or_insert_with(|| RegulationEntry {
                            vocabulary_key: None,
                            name: None,
                            referenced_by_controls: Vec::new(),
                        })
                        .referenced_by_controls
                        .push(key.clone());
                }
            }
        }
    }

    for entry in registry.values_mut() {
        let mut seen = HashSet::new();
        entry.referenced_by_controls.retain(|k| seen.insert(k.clone()));
    }

    registry
}

//! # Reference & Control Identifiers
//!
//! Newtypes for the three identifier kinds the manifest pipeline works
//! with: canonical event ids, canonical field ids, and control keys.
//!
//! ## Canonical form
//!
//! Event and field ids are dotted, lowercase-initial identifiers
//! (e.g. `member.created`, `cda.limit.internal_buffer`). They are produced
//! by the [`ReferenceNormalizer`](crate::ReferenceNormalizer) or supplied
//! by the controlled vocabulary; construction here is unchecked because
//! the pipeline is total: it annotates unknown references instead of
//! rejecting them.

use serde::{Deserialize, Serialize};

/// A canonical event identifier (e.g. `governance.policy_version_approved`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    /// Create an event identifier from a canonical string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The category prefix: the segment before the first dot, or the whole
    /// id when it contains no dot (`member.created` -> `member`).
    pub fn category(&self) -> &str {
        match self.0.split_once('.') {
            Some((head, _)) => head,
            None => &self.0,
        }
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A canonical field identifier (e.g. `decision.outcome`).
///
/// Vocabulary keys may carry trailing `[]` array markers
/// (`cda.glossary.items[]`); [`FieldId::strip_array_markers`] removes them
/// so vocabulary keys and control references resolve to the same registry
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(String);

impl FieldId {
    /// Create a field identifier from a canonical string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The category prefix: the segment before the first dot, or the whole
    /// id when it contains no dot.
    pub fn category(&self) -> &str {
        match self.0.split_once('.') {
            Some((head, _)) => head,
            None => &self.0,
        }
    }

    /// Return the id with every `[]` array marker removed
    /// (`cda.glossary.items[]` -> `cda.glossary.items`).
    pub fn strip_array_markers(&self) -> FieldId {
        FieldId(self.0.replace("[]", ""))
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The globally unique key of a control within a working set.
///
/// Either the control's authored `scoped_id`, or derived from its source
/// document and local id as `source_file:id` (with `unknown` standing in
/// for an absent source). Two controls sharing a key are the same logical
/// control; last write wins on merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlKey(String);

impl ControlKey {
    /// Create a control key from an authored scoped id.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derive a key from a source document name and a local control id.
    /// An empty source falls back to `unknown`.
    pub fn scoped(source_file: &str, id: &str) -> Self {
        let source = if source_file.is_empty() {
            "unknown"
        } else {
            source_file
        };
        Self(format!("{source}:{id}"))
    }

    /// Access the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ControlKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

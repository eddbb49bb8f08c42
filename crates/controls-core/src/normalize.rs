//! # Reference Normalizer
//!
//! Control documents are authored by hand, so event and field references
//! arrive in loose shapes: prose with a parenthesized id, a bare dotted id,
//! comma-separated lists with comparison expressions, or plain prose with
//! no id at all. The normalizer extracts canonical identifiers from these
//! shapes without ever failing; unparseable input yields `None` or an
//! empty list and the caller records the reference as unresolved.
//!
//! ## Accepted event shapes
//!
//! | Input                              | Extracted            |
//! |------------------------------------|----------------------|
//! | `Member joins (member.created)`    | `member.created`     |
//! | `Limit breached (cda.limit.breach` | `cda.limit.breach`   |
//! | `member.created`                   | `member.created`     |
//! | `Member joins the cooperative`     | none                 |
//!
//! ## Accepted field shapes
//!
//! Field references are comma-separated lists, optionally parenthesized,
//! where each part may carry a comparison (`decision.outcome = approved`,
//! `member.status ∈ {active}`). Only the identifier before the comparator
//! is kept, and only when it looks like a dotted or underscored path.
//! Trailing `[]` array markers are stripped from the result.

use regex::Regex;

use crate::identifier::{EventId, FieldId};

/// Characters that begin a comparison expression inside a field reference.
/// Everything from the first of these onward is discarded.
const COMPARATOR_CHARS: [char; 4] = ['=', '∈', '<', '>'];

/// Extracts canonical event and field identifiers from loosely formatted
/// reference strings.
///
/// The patterns are fixed at compile time; construct once and reuse.
/// Normalization is total: malformed input is never an error, it simply
/// produces no identifiers.
#[derive(Debug)]
pub struct ReferenceNormalizer {
    /// `(member.created)` embedded anywhere in prose.
    paren_event: Regex,
    /// `(member.created` left unclosed at the end of the string.
    trailing_event: Regex,
    /// A bare dotted id with no surrounding prose.
    bare_event: Regex,
    /// The shape a field path must have to be kept, including `*` wildcard
    /// segments and `[]` array markers.
    field_shape: Regex,
}

impl ReferenceNormalizer {
    /// Build a normalizer with the canonical reference grammar.
    pub fn new() -> Self {
        Self {
            paren_event: Regex::new(r"\(([a-z][a-z0-9_.]+)\)")
                .expect("paren event pattern compiles"),
            trailing_event: Regex::new(r"\(([a-z][a-z0-9_.]+)$")
                .expect("trailing event pattern compiles"),
            bare_event: Regex::new(r"^[a-z][a-z0-9_.]+$")
                .expect("bare event pattern compiles"),
            field_shape: Regex::new(r"^[a-z][a-z0-9_.*\[\]]*$")
                .expect("field shape pattern compiles"),
        }
    }

    /// Extract the canonical event id from a raw trigger or emission
    /// reference.
    ///
    /// Resolution order: first parenthesized id, then an id after an
    /// unclosed `(` at the end of the string, then the whole string if it
    /// is already a bare id. Prose without an id yields `None`.
    pub fn event_id(&self, raw: &str) -> Option<EventId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(caps) = self.paren_event.captures(trimmed) {
            return Some(EventId::new(&caps[1]));
        }
        if let Some(caps) = self.trailing_event.captures(trimmed) {
            return Some(EventId::new(&caps[1]));
        }
        if self.bare_event.is_match(trimmed) {
            return Some(EventId::new(trimmed));
        }
        None
    }

    /// Extract canonical field ids from a raw field list reference.
    ///
    /// Strips at most one surrounding paren pair, splits on commas, cuts
    /// each part at the first comparator, and keeps parts that look like
    /// dotted or underscored paths. Order is preserved and duplicates are
    /// kept; deduplication happens when references are attached to a
    /// control.
    pub fn field_ids(&self, raw: &str) -> Vec<FieldId> {
        // One paren pair is stripped from the raw ends before trimming, so
        // `" (a.b) "` keeps its parens and is dropped by the shape check.
        let stripped = raw.strip_prefix('(').unwrap_or(raw);
        let stripped = stripped.strip_suffix(')').unwrap_or(stripped);
        let trimmed = stripped.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            let candidate = match part.find(COMPARATOR_CHARS) {
                Some(stop) => part[..stop].trim(),
                None => part,
            };
            if !self.field_shape.is_match(candidate) {
                continue;
            }
            // Single bare words ("outcome") are prose, not field paths.
            if !candidate.contains('.') && !candidate.contains('_') {
                continue;
            }
            out.push(FieldId::new(candidate.replace("[]", "")));
        }
        out
    }
}

impl Default for ReferenceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_prefers_parenthesized_id() {
        let n = ReferenceNormalizer::new();
        assert_eq!(
            n.event_id("Member joins (member.created)"),
            Some(EventId::new("member.created"))
        );
    }

    #[test]
    fn event_id_first_parenthesized_id_wins() {
        let n = ReferenceNormalizer::new();
        assert_eq!(
            n.event_id("(member.created) or (member.closed)"),
            Some(EventId::new("member.created"))
        );
    }

    #[test]
    fn event_id_recovers_unclosed_paren() {
        let n = ReferenceNormalizer::new();
        assert_eq!(
            n.event_id("Limit breached (cda.limit.internal_buffer"),
            Some(EventId::new("cda.limit.internal_buffer"))
        );
    }

    #[test]
    fn event_id_accepts_bare_id() {
        let n = ReferenceNormalizer::new();
        assert_eq!(
            n.event_id("governance.policy_version_approved"),
            Some(EventId::new("governance.policy_version_approved"))
        );
    }

    #[test]
    fn event_id_rejects_prose() {
        let n = ReferenceNormalizer::new();
        assert_eq!(n.event_id("Member joins the cooperative"), None);
    }

    #[test]
    fn event_id_rejects_uppercase() {
        let n = ReferenceNormalizer::new();
        assert_eq!(n.event_id("Member.Created"), None);
    }

    #[test]
    fn event_id_rejects_empty_and_whitespace() {
        let n = ReferenceNormalizer::new();
        assert_eq!(n.event_id(""), None);
        assert_eq!(n.event_id("   "), None);
    }

    #[test]
    fn field_ids_splits_parenthesized_list() {
        let n = ReferenceNormalizer::new();
        let ids = n.field_ids("(decision.outcome = approved, decision.timestamp)");
        assert_eq!(
            ids,
            vec![
                FieldId::new("decision.outcome"),
                FieldId::new("decision.timestamp"),
            ]
        );
    }

    #[test]
    fn field_ids_cuts_at_set_membership() {
        let n = ReferenceNormalizer::new();
        // The set literal splits on its own comma but neither piece
        // survives the shape check.
        let ids = n.field_ids("member.status ∈ {active, pending}");
        assert_eq!(ids, vec![FieldId::new("member.status")]);
    }

    #[test]
    fn field_ids_strips_array_markers() {
        let n = ReferenceNormalizer::new();
        let ids = n.field_ids("(cda.glossary.items[])");
        assert_eq!(ids, vec![FieldId::new("cda.glossary.items")]);
    }

    #[test]
    fn field_ids_keeps_wildcard_paths() {
        let n = ReferenceNormalizer::new();
        let ids = n.field_ids("member.*");
        assert_eq!(ids, vec![FieldId::new("member.*")]);
    }

    #[test]
    fn field_ids_drops_prose_parts() {
        let n = ReferenceNormalizer::new();
        let ids = n.field_ids("(the approved outcome, decision.outcome)");
        assert_eq!(ids, vec![FieldId::new("decision.outcome")]);
    }

    #[test]
    fn field_ids_keeps_underscored_bare_word() {
        let n = ReferenceNormalizer::new();
        assert_eq!(n.field_ids("risk_rating"), vec![FieldId::new("risk_rating")]);
    }

    #[test]
    fn field_ids_drops_single_bare_word() {
        let n = ReferenceNormalizer::new();
        assert!(n.field_ids("outcome").is_empty());
    }

    #[test]
    fn field_ids_preserves_order_and_duplicates() {
        let n = ReferenceNormalizer::new();
        let ids = n.field_ids("b.c, a.b, b.c");
        assert_eq!(
            ids,
            vec![
                FieldId::new("b.c"),
                FieldId::new("a.b"),
                FieldId::new("b.c"),
            ]
        );
    }

    #[test]
    fn field_ids_of_empty_input_is_empty() {
        let n = ReferenceNormalizer::new();
        assert!(n.field_ids("").is_empty());
        assert!(n.field_ids("()").is_empty());
        assert!(n.field_ids("   ").is_empty());
    }

    #[test]
    fn field_ids_strips_only_one_paren_pair_before_trim() {
        let n = ReferenceNormalizer::new();
        // Outer whitespace means the parens survive stripping and the part
        // fails the shape check.
        assert!(n.field_ids(" (a.b) ").is_empty());
        assert_eq!(n.field_ids("(a.b)"), vec![FieldId::new("a.b")]);
    }
}

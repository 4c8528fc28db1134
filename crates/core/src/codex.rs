//! Codex reconciliation: merging candidate characters into the entry set.
//!
//! The merge honors per-entry lock state and never duplicates an entry
//! that already exists. Matching uses case-insensitive name equality plus
//! the Character kind — a heuristic identity, not a stable key: when the
//! codex already contains near-identical names, the first match in codex
//! order wins and the ambiguity is left to the author. The routine itself
//! never creates duplicates.

use uuid::Uuid;

use crate::extraction::CandidateCharacter;
use crate::model::{CodexEntry, EntryKind};

// ---------------------------------------------------------------------------
// Merge outcome
// ---------------------------------------------------------------------------

/// Result of merging a batch of candidates into a codex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodexMergeOutcome {
    /// The codex after the merge.
    pub codex: Vec<CodexEntry>,
    /// Candidates that appended a new entry.
    pub created: u32,
    /// Candidates that overwrote an unlocked match.
    pub updated: u32,
    /// Candidates discarded because their match was locked.
    pub skipped_locked: u32,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge extracted candidates into an existing codex, in input order.
///
/// For each candidate:
/// - a locked match discards the candidate entirely (no fields change);
/// - an unlocked match has its `description`/`details`/`notes` overwritten
///   from the candidate's formatted fields, preserving `id`, `is_locked`,
///   and `image`;
/// - no match appends a new **unlocked** Character entry with a fresh id,
///   so subsequent scans may continue to refine it.
pub fn merge_candidates(
    candidates: &[CandidateCharacter],
    existing: &[CodexEntry],
) -> CodexMergeOutcome {
    let mut outcome = CodexMergeOutcome {
        codex: existing.to_vec(),
        created: 0,
        updated: 0,
        skipped_locked: 0,
    };

    for candidate in candidates {
        let needle = candidate.name.to_lowercase();
        let matched = outcome
            .codex
            .iter_mut()
            .find(|entry| entry.kind == EntryKind::Character && entry.name.to_lowercase() == needle);

        match matched {
            Some(entry) if entry.is_locked => {
                outcome.skipped_locked += 1;
            }
            Some(entry) => {
                entry.description = description_text(candidate);
                entry.details = details_text(candidate);
                entry.notes = notes_text(candidate);
                outcome.updated += 1;
            }
            None => {
                outcome.codex.push(character_entry(candidate, false));
                outcome.created += 1;
            }
        }
    }

    outcome
}

/// Build a new codex entry from a manual import.
///
/// Manual imports bypass matching and always append, locked by default:
/// a hand-written entry is authoritative and must not be overwritten by a
/// later automated scan. This asymmetry with [`merge_candidates`] is
/// deliberate.
pub fn manual_entry(candidate: &CandidateCharacter) -> CodexEntry {
    character_entry(candidate, true)
}

fn character_entry(candidate: &CandidateCharacter, locked: bool) -> CodexEntry {
    CodexEntry {
        id: Uuid::new_v4(),
        name: candidate.name.clone(),
        kind: EntryKind::Character,
        description: description_text(candidate),
        details: details_text(candidate),
        notes: notes_text(candidate),
        is_locked: locked,
        image: None,
    }
}

// ---------------------------------------------------------------------------
// Field formatting
// ---------------------------------------------------------------------------

/// Entry description: the candidate's role (already "Unknown" when absent).
fn description_text(candidate: &CandidateCharacter) -> String {
    candidate.role.clone()
}

/// Labeled detail lines. The four template fields always appear, so the UI
/// shows a consistent layout; the wider manual-import keys appear only
/// when present.
fn details_text(candidate: &CandidateCharacter) -> String {
    let mut lines = vec![
        format!("Age: {}", candidate.age),
        format!("Appearance: {}", candidate.appearance),
        format!("Personality: {}", candidate.personality),
        format!("Background: {}", candidate.background),
    ];
    if let Some(arc) = &candidate.arc {
        lines.push(format!("Character Arc: {arc}"));
    }
    if let Some(relationships) = &candidate.relationships {
        lines.push(format!("Key Relationships: {relationships}"));
    }
    lines.join("\n")
}

/// Notes: the traits line plus any preserved unrecognized-key text.
fn notes_text(candidate: &CandidateCharacter) -> String {
    let mut notes = format!("Notable Traits: {}", candidate.traits);
    if let Some(extra) = &candidate.extra_notes {
        notes.push('\n');
        notes.push_str(extra);
    }
    notes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{parse_manual_import, UNKNOWN_FIELD};

    fn candidate(name: &str, role: &str) -> CandidateCharacter {
        let mut c = parse_manual_import(name).unwrap();
        c.role = role.to_string();
        c
    }

    fn entry(name: &str, kind: EntryKind, locked: bool) -> CodexEntry {
        CodexEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            description: "original description".to_string(),
            details: "original details".to_string(),
            notes: "original notes".to_string(),
            is_locked: locked,
            image: Some("cG9ydHJhaXQ=".to_string()),
        }
    }

    // -- lock handling -------------------------------------------------------

    #[test]
    fn locked_match_left_byte_identical() {
        let existing = vec![entry("Aria", EntryKind::Character, true)];
        let outcome = merge_candidates(&[candidate("Aria", "Captain")], &existing);

        assert_eq!(outcome.codex, existing);
        assert_eq!(outcome.skipped_locked, 1);
        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.created, 0);
    }

    #[test]
    fn unlocked_match_overwritten_preserving_identity() {
        let existing = vec![entry("Aria", EntryKind::Character, false)];
        let outcome = merge_candidates(&[candidate("Aria", "Captain")], &existing);

        let merged = &outcome.codex[0];
        assert_eq!(merged.id, existing[0].id);
        assert!(!merged.is_locked);
        assert_eq!(merged.image, existing[0].image);
        assert_eq!(merged.description, "Captain");
        assert!(merged.details.contains("Age: Unknown"));
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.codex.len(), 1);
    }

    // -- matching ------------------------------------------------------------

    #[test]
    fn match_is_case_insensitive() {
        let existing = vec![entry("ARIA", EntryKind::Character, false)];
        let outcome = merge_candidates(&[candidate("aria", "Captain")], &existing);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.created, 0);
    }

    #[test]
    fn same_name_different_kind_does_not_match() {
        // A Location named "Aria" is not the character "Aria".
        let existing = vec![entry("Aria", EntryKind::Location, false)];
        let outcome = merge_candidates(&[candidate("Aria", "Captain")], &existing);

        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.codex.len(), 2);
        assert_eq!(outcome.codex[0].description, "original description");
    }

    #[test]
    fn first_match_in_codex_order_wins_for_preexisting_duplicates() {
        let first = entry("Aria", EntryKind::Character, false);
        let second = entry("Aria", EntryKind::Character, false);
        let existing = vec![first.clone(), second.clone()];
        let outcome = merge_candidates(&[candidate("Aria", "Captain")], &existing);

        assert_eq!(outcome.codex[0].description, "Captain");
        assert_eq!(outcome.codex[1].description, "original description");
        assert_eq!(outcome.codex.len(), 2);
    }

    // -- creation ------------------------------------------------------------

    #[test]
    fn no_match_appends_fresh_unlocked_entry() {
        let existing = vec![entry("Aria", EntryKind::Character, false)];
        let outcome = merge_candidates(&[candidate("Bram", "Smith")], &existing);

        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.codex.len(), 2);
        let added = &outcome.codex[1];
        assert_eq!(added.name, "Bram");
        assert_eq!(added.kind, EntryKind::Character);
        assert!(!added.is_locked);
        assert_ne!(added.id, existing[0].id);
    }

    #[test]
    fn created_entry_renders_unknown_placeholders() {
        let outcome = merge_candidates(&[candidate("Bram", UNKNOWN_FIELD)], &[]);
        let added = &outcome.codex[0];
        assert_eq!(added.description, UNKNOWN_FIELD);
        assert!(added.details.contains("Appearance: Unknown"));
        assert!(added.notes.contains("Notable Traits: Unknown"));
    }

    #[test]
    fn candidates_processed_in_input_order() {
        let outcome = merge_candidates(
            &[candidate("Bram", "Smith"), candidate("bram", "Blacksmith")],
            &[],
        );
        // The second candidate matches the entry the first one created.
        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.codex[0].description, "Blacksmith");
    }

    // -- manual entries ------------------------------------------------------

    #[test]
    fn manual_entry_is_locked_and_new() {
        let candidate = parse_manual_import("Mira\nRole: Scout\nAge: 19").unwrap();
        let entry = manual_entry(&candidate);

        assert!(entry.is_locked);
        assert_eq!(entry.kind, EntryKind::Character);
        assert_eq!(entry.description, "Scout");
        assert!(entry.details.contains("Age: 19"));
    }

    #[test]
    fn manual_entry_appends_even_when_name_exists() {
        // Manual imports bypass matching entirely.
        let existing = vec![entry("Mira", EntryKind::Character, false)];
        let candidate = parse_manual_import("Mira\nRole: Scout").unwrap();
        let new_entry = manual_entry(&candidate);

        assert_ne!(new_entry.id, existing[0].id);
        assert!(new_entry.is_locked);
    }

    #[test]
    fn manual_extras_flow_into_details_and_notes() {
        let candidate = parse_manual_import(
            "Mira\nCharacter Arc: Reluctant hero\nWeapon: Recurve bow",
        )
        .unwrap();
        let entry = manual_entry(&candidate);
        assert!(entry.details.contains("Character Arc: Reluctant hero"));
        assert!(entry.notes.contains("Weapon: Recurve bow"));
    }
}

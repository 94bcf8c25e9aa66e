//! Import gate
//!
//! Two check surfaces:
//!
//! 1. **Upload gate** (`validate_import`): runs on a freshly uploaded batch
//!    before it may merge. Fail-fast: the first violation in batch order is
//!    returned, checks run in the order shape, record (time and response),
//!    bid note, character, note rule. An entry that passes always normalizes
//!    once its character is known.
//!
//! 2. **Stored-data audit** (`audit_stored`): collects every violation in an
//!    already stored log for display. Never blocks a write.
//!
//! Content checks apply to new entries only. Stored entries may have been
//! corrected by a fix and are not re-checked on import.

use std::collections::BTreeSet;

use dkp_schemas::date::combine_raw_timestamp;
use dkp_schemas::{validate_note, RawLootEntry, Roster};

use crate::ImportError;

// ---------------------------------------------------------------------------
// Upload gate
// ---------------------------------------------------------------------------

/// Batch-level shape: non-empty, unique ids, one raid day.
pub fn check_batch_shape(batch: &[RawLootEntry]) -> Result<(), ImportError> {
    let first = batch.first().ok_or(ImportError::EmptyBatch)?;

    let mut ids = BTreeSet::new();
    for entry in batch {
        if !ids.insert(entry.id.as_str()) {
            return Err(ImportError::DuplicateId {
                id: entry.id.clone(),
            });
        }
    }

    if let Some(other) = batch.iter().find(|e| e.date != first.date) {
        return Err(ImportError::DateMismatch {
            id: other.id.clone(),
            expected: first.date.clone(),
            found: other.date.clone(),
        });
    }

    Ok(())
}

/// Fields every entry needs before it can become a clean entry.
fn check_record(e: &RawLootEntry) -> Result<(), ImportError> {
    if let Err(problem) = combine_raw_timestamp(&e.date, &e.time) {
        return Err(ImportError::InvalidTimestamp {
            id: e.id.clone(),
            problem,
        });
    }
    if e.response.trim().is_empty() {
        return Err(ImportError::MissingResponse {
            id: e.id.clone(),
            character: e.character_name.clone(),
        });
    }
    Ok(())
}

/// Per-entry content: readable record, bid note present, character known,
/// note rule.
pub fn check_batch_content(batch: &[RawLootEntry], roster: &Roster) -> Result<(), ImportError> {
    batch.iter().try_for_each(check_record)?;

    if let Some(e) = batch
        .iter()
        .find(|e| e.is_bid() && e.note.trim().is_empty())
    {
        return Err(ImportError::MissingBidNote {
            id: e.id.clone(),
            character: e.character_name.clone(),
        });
    }

    if let Some(e) = batch
        .iter()
        .find(|e| !roster.is_known_character(&e.character_name))
    {
        return Err(ImportError::UnknownCharacter {
            id: e.id.clone(),
            character: e.character_name.clone(),
        });
    }

    for e in batch {
        if let Err(problem) = validate_note(&e.note) {
            return Err(ImportError::InvalidNote {
                id: e.id.clone(),
                note: e.note.clone(),
                problem,
            });
        }
    }

    Ok(())
}

/// Full upload gate over a batch of new entries.
pub fn validate_import(batch: &[RawLootEntry], roster: &Roster) -> Result<(), ImportError> {
    check_batch_shape(batch)?;
    check_batch_content(batch, roster)
}

// ---------------------------------------------------------------------------
// Stored-data audit
// ---------------------------------------------------------------------------

/// Characters in `characters` no roster player owns; sorted, distinct.
pub fn unknown_characters<'a, I>(roster: &Roster, characters: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    characters
        .into_iter()
        .filter(|c| !roster.is_known_character(c))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every consistency problem of a stored log.
///
/// Unknown characters are reported once each (sorted), followed by
/// unreadable records and invalid notes in log order.
pub fn audit_stored(entries: &[RawLootEntry], roster: &Roster) -> Vec<ImportError> {
    let mut problems = Vec::new();

    let mut reported = BTreeSet::new();
    let mut unknown: Vec<&RawLootEntry> = entries
        .iter()
        .filter(|e| !roster.is_known_character(&e.character_name))
        .filter(|e| reported.insert(e.character_name.as_str()))
        .collect();
    unknown.sort_by(|a, b| a.character_name.cmp(&b.character_name));
    problems.extend(unknown.into_iter().map(|e| ImportError::UnknownCharacter {
        id: e.id.clone(),
        character: e.character_name.clone(),
    }));

    for e in entries {
        if let Err(problem) = check_record(e) {
            problems.push(problem);
        }
        if let Err(problem) = validate_note(&e.note) {
            problems.push(ImportError::InvalidNote {
                id: e.id.clone(),
                note: e.note.clone(),
                problem,
            });
        }
    }

    problems
}

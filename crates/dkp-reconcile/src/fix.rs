//! Field-level corrections of stored raw entries.
//!
//! Fixes produce a full replacement collection; `existing` is never touched.
//! Entries a fix does not name are returned unchanged, including every
//! passthrough field.

use std::collections::BTreeMap;

use dkp_schemas::{Fix, RawLootEntry};

use crate::{FieldChange, FixError};

fn index_by_id(entries: &[RawLootEntry]) -> BTreeMap<&str, usize> {
    let mut index = BTreeMap::new();
    for (i, e) in entries.iter().enumerate() {
        // First holder of an id is the one merge kept.
        index.entry(e.id.as_str()).or_insert(i);
    }
    index
}

/// Apply `fixes` in order and return the patched collection.
///
/// Fails with [`FixError::EntryNotFound`] if any fix names an id that is not
/// stored; in that case nothing is applied. Applying the same fixes twice
/// yields the same collection as applying them once.
pub fn apply_fixes(existing: &[RawLootEntry], fixes: &[Fix]) -> Result<Vec<RawLootEntry>, FixError> {
    let index = index_by_id(existing);
    let mut patched = existing.to_vec();

    for fix in fixes {
        let pos = *index
            .get(fix.id.as_str())
            .ok_or_else(|| FixError::EntryNotFound { id: fix.id.clone() })?;
        for entry in &fix.entries {
            patched[pos].apply_fix_entry(entry);
        }
    }

    Ok(patched)
}

/// What [`apply_fixes`] would change, field by field.
///
/// Pairs whose value already matches are left out, so an empty preview means
/// the write would be a no-op.
pub fn preview_fixes(existing: &[RawLootEntry], fixes: &[Fix]) -> Result<Vec<FieldChange>, FixError> {
    let index = index_by_id(existing);
    let mut scratch = existing.to_vec();
    let mut changes = Vec::new();

    for fix in fixes {
        let pos = *index
            .get(fix.id.as_str())
            .ok_or_else(|| FixError::EntryNotFound { id: fix.id.clone() })?;
        for entry in &fix.entries {
            let before = scratch[pos].fix_field_value(entry.field).to_string();
            if before == entry.value {
                continue;
            }
            scratch[pos].apply_fix_entry(entry);
            changes.push(FieldChange {
                id: fix.id.clone(),
                field: entry.field,
                before,
                after: entry.value.clone(),
            });
        }
    }

    Ok(changes)
}

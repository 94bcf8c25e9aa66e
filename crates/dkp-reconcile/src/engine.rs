use std::collections::BTreeSet;

use dkp_schemas::RawLootEntry;

use crate::{MergeReport, ReconcileDiff};

fn push_diff(diffs: &mut Vec<ReconcileDiff>, id: &str, field: &str, stored: &str, incoming: &str) {
    if stored != incoming {
        diffs.push(ReconcileDiff {
            id: id.to_string(),
            field: field.to_string(),
            stored: stored.to_string(),
            incoming: incoming.to_string(),
        });
    }
}

fn compare_entries(stored: &RawLootEntry, incoming: &RawLootEntry, diffs: &mut Vec<ReconcileDiff>) {
    let id = stored.id.as_str();
    let before = diffs.len();

    push_diff(diffs, id, "player", &stored.character_name, &incoming.character_name);
    push_diff(diffs, id, "date", &stored.date, &incoming.date);
    push_diff(diffs, id, "time", &stored.time, &incoming.time);
    push_diff(
        diffs,
        id,
        "itemID",
        &stored.item_id.to_string(),
        &incoming.item_id.to_string(),
    );
    push_diff(diffs, id, "itemName", &stored.item_name, &incoming.item_name);
    push_diff(diffs, id, "response", &stored.response, &incoming.response);
    push_diff(diffs, id, "note", &stored.note, &incoming.note);
    push_diff(diffs, id, "instance", &stored.instance, &incoming.instance);
    push_diff(diffs, id, "boss", &stored.boss, &incoming.boss);

    // Passthrough fields are not itemised.
    if diffs.len() == before && stored != incoming {
        diffs.push(ReconcileDiff {
            id: id.to_string(),
            field: "passthrough".to_string(),
            stored: String::new(),
            incoming: String::new(),
        });
    }
}

/// Incoming entries whose id is not stored yet, in upload order.
///
/// Later duplicates inside `incoming` itself are dropped as well.
pub fn filter_new(existing: &[RawLootEntry], incoming: &[RawLootEntry]) -> Vec<RawLootEntry> {
    let mut seen: BTreeSet<&str> = existing.iter().map(|e| e.id.as_str()).collect();
    incoming
        .iter()
        .filter(|e| seen.insert(e.id.as_str()))
        .cloned()
        .collect()
}

/// Union keyed by id; the stored entry wins.
///
/// `existing` keeps its order, new ids are appended in `incoming` order.
/// Idempotent: `merge(&merge(a, b), b) == merge(a, b)`.
pub fn merge(existing: &[RawLootEntry], incoming: &[RawLootEntry]) -> Vec<RawLootEntry> {
    let mut merged = existing.to_vec();
    merged.extend(filter_new(existing, incoming));
    merged
}

/// [`merge`] plus evidence of what was appended and what was dropped.
pub fn merge_with_report(existing: &[RawLootEntry], incoming: &[RawLootEntry]) -> MergeReport {
    let mut merged = existing.to_vec();
    let mut seen: BTreeSet<String> = existing.iter().map(|e| e.id.clone()).collect();
    let mut appended = Vec::new();
    let mut already_stored = Vec::new();
    let mut diffs = Vec::new();

    for entry in incoming {
        if seen.insert(entry.id.clone()) {
            appended.push(entry.id.clone());
            merged.push(entry.clone());
            continue;
        }
        already_stored.push(entry.id.clone());
        // Compare against the first holder of this id (stored or earlier upload row).
        if let Some(stored) = merged.iter().find(|e| e.id == entry.id) {
            compare_entries(stored, entry, &mut diffs);
        }
    }

    diffs.sort();

    MergeReport {
        merged,
        appended,
        already_stored,
        diffs,
    }
}

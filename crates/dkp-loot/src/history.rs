//! Loot history orderings.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use dkp_schemas::date::format_timestamp;
use dkp_schemas::LootEntry;

/// Newest loot event: when, and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastUpdate {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub boss: String,
    pub difficulty: String,
}

impl fmt::Display for LastUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Boss: {}, {})",
            format_timestamp(&self.timestamp),
            self.boss,
            self.difficulty
        )
    }
}

fn serialize_timestamp<S: serde::Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(ts))
}

/// Entries whose response is a bid, in input order.
pub fn bids_only(entries: &[LootEntry]) -> Vec<LootEntry> {
    entries.iter().filter(|e| e.is_bid()).cloned().collect()
}

/// Newest first; ties broken by id so the order is total.
pub fn sort_latest_first(entries: &mut [LootEntry]) {
    entries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Timestamp, boss and difficulty of the newest entry; `None` if empty.
pub fn last_update(entries: &[LootEntry]) -> Option<LastUpdate> {
    entries
        .iter()
        .min_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|e| LastUpdate {
            timestamp: e.timestamp,
            boss: e.boss.clone(),
            difficulty: e.difficulty.clone(),
        })
}

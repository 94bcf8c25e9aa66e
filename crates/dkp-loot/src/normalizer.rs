//! Raw -> clean loot projection.
//!
//! Every output entry has passed [`LootEntry::validated`]. The projection is
//! deterministic; input order is kept.

use std::fmt;

use dkp_schemas::date::combine_raw_timestamp;
use dkp_schemas::{LootEntry, RawLootEntry, Roster, ValidationError};

/// Item pages are linked as `{base}{item_id}`.
pub const DEFAULT_ITEM_LINK_BASE: &str = "https://www.wowhead.com/item=";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// No roster player owns the entry's character. Uploads are gated on
    /// this, so reaching it means stored data and roster diverged.
    UnknownCharacter { id: String, character: String },
    /// Timestamp or field validation failed.
    Invalid(ValidationError),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::UnknownCharacter { id, character } => {
                write!(f, "unknown character {character} in loot entry \"{id}\"")
            }
            NormalizeError::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for NormalizeError {}

impl From<ValidationError> for NormalizeError {
    fn from(e: ValidationError) -> Self {
        NormalizeError::Invalid(e)
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Projection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    pub item_link_base: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_LINK_BASE)
    }
}

impl Normalizer {
    pub fn new(item_link_base: impl Into<String>) -> Self {
        Self {
            item_link_base: item_link_base.into(),
        }
    }

    /// Project one raw entry.
    pub fn normalize_entry(&self, raw: &RawLootEntry, roster: &Roster) -> Result<LootEntry, NormalizeError> {
        let player = roster
            .player_for_character(&raw.character_name)
            .ok_or_else(|| NormalizeError::UnknownCharacter {
                id: raw.id.clone(),
                character: raw.character_name.clone(),
            })?;

        let timestamp = combine_raw_timestamp(&raw.date, &raw.time)?;
        let (instance, difficulty) = split_instance(&raw.instance);

        let entry = LootEntry {
            id: raw.id.clone(),
            timestamp,
            player: player.name.clone(),
            note: raw.note.trim().to_string(),
            item_name: raw.item_name.clone(),
            item_link: format!("{}{}", self.item_link_base, raw.item_id),
            item_id: raw.item_id.to_string(),
            boss: first_segment(&raw.boss, ',').to_string(),
            difficulty: difficulty.to_string(),
            instance: instance.to_string(),
            character: raw.character_name.clone(),
            response: raw.response.clone(),
        };

        Ok(entry.validated()?)
    }

    /// Project a whole log; fails on the first entry that does not project.
    pub fn normalize_all(&self, raw: &[RawLootEntry], roster: &Roster) -> Result<Vec<LootEntry>, NormalizeError> {
        raw.iter().map(|r| self.normalize_entry(r, roster)).collect()
    }
}

/// [`Normalizer::normalize_all`] with default item links.
pub fn normalize(raw: &[RawLootEntry], roster: &Roster) -> Result<Vec<LootEntry>, NormalizeError> {
    Normalizer::default().normalize_all(raw, roster)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn first_segment(s: &str, sep: char) -> &str {
    s.split(sep).next().unwrap_or_default()
}

/// `"Amirdrassil, the Dream's Hope-Heroic"` -> `("Amirdrassil", "Heroic")`.
///
/// Difficulty is the second hyphen segment, empty when there is none.
fn split_instance(raw: &str) -> (&str, &str) {
    let instance = first_segment(first_segment(raw, '-'), ',');
    let difficulty = raw.split('-').nth(1).unwrap_or_default();
    (instance, difficulty)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

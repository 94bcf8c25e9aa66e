use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

use crate::date::{format_timestamp, to_iso_date};
use crate::{FixEntry, FixField, NoteError, ValidationError};

/// Response text the loot addon writes for "bid points on this item".
/// The only response that costs points.
pub const BID_RESPONSE: &str = "Gebot";

// ---------------------------------------------------------------------------
// Note rule
// ---------------------------------------------------------------------------

/// Parse a bid note.
///
/// - blank (empty or whitespace only) -> `Ok(None)`
/// - ASCII digits only, > 0, multiple of 10 -> `Ok(Some(amount))`
/// - anything else -> `Err`
///
/// Signs are not digits: `"+80"` and `"-10"` are rejected.
pub fn parse_note(note: &str) -> Result<Option<u64>, NoteError> {
    if note.trim().is_empty() {
        return Ok(None);
    }
    if !note.chars().all(|c| c.is_ascii_digit()) {
        return Err(NoteError::NotInteger);
    }
    let amount: u64 = note.parse().map_err(|_| NoteError::NotInteger)?;
    if amount == 0 {
        return Err(NoteError::NotPositive);
    }
    if amount % 10 != 0 {
        return Err(NoteError::NotMultipleOfTen);
    }
    Ok(Some(amount))
}

pub fn validate_note(note: &str) -> Result<(), NoteError> {
    parse_note(note).map(|_| ())
}

// ---------------------------------------------------------------------------
// Raw export entry
// ---------------------------------------------------------------------------

/// One bid/pass record exactly as exported by the loot addon.
///
/// Serialized field names are the export's own, so a stored document
/// round-trips byte for byte through this type. The character is exported
/// under the key `player`; in Rust it is `character_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLootEntry {
    #[serde(rename = "player")]
    pub character_name: String,
    /// `d/m/yy`, identical for every entry of one export.
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    /// Stable across re-exports; the merge key.
    pub id: String,
    #[serde(rename = "itemID")]
    pub item_id: u64,
    #[serde(rename = "itemString", default)]
    pub item_string: String,
    pub response: String,
    #[serde(default)]
    pub votes: i64,
    #[serde(rename = "class", default)]
    pub class: String,
    pub instance: String,
    pub boss: String,
    #[serde(default)]
    pub gear1: String,
    #[serde(default)]
    pub gear2: String,
    #[serde(rename = "responseID", default)]
    pub response_id: String,
    #[serde(rename = "isAwardReason", default)]
    pub is_award_reason: String,
    #[serde(rename = "rollType", default)]
    pub roll_type: String,
    #[serde(rename = "subType", default)]
    pub sub_type: String,
    #[serde(rename = "equipLoc", default)]
    pub equip_loc: String,
    /// Bid amount as typed by the player; free text.
    pub note: String,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "itemName")]
    pub item_name: String,
}

impl RawLootEntry {
    pub fn is_bid(&self) -> bool {
        self.response == BID_RESPONSE
    }

    /// The raid day this entry belongs to.
    pub fn raid_day(&self) -> Result<NaiveDate, ValidationError> {
        to_iso_date(&self.date)
    }

    /// Overwrite one field addressed by its clean name.
    ///
    /// This is the only place where the clean `character` name is mapped
    /// onto the export's `player` key.
    pub fn apply_fix_entry(&mut self, entry: &FixEntry) {
        match entry.field {
            FixField::Character => self.character_name = entry.value.clone(),
            FixField::Note => self.note = entry.value.clone(),
            FixField::Response => self.response = entry.value.clone(),
        }
    }

    /// Current value of a fixable field.
    pub fn fix_field_value(&self, field: FixField) -> &str {
        match field {
            FixField::Character => &self.character_name,
            FixField::Note => &self.note,
            FixField::Response => &self.response,
        }
    }
}

// ---------------------------------------------------------------------------
// Clean entry
// ---------------------------------------------------------------------------

/// Player-resolved projection of a [`RawLootEntry`].
///
/// Build with a struct literal and pass through [`LootEntry::validated`];
/// everything entering the balance calculation has gone through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LootEntry {
    pub id: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Guild player display name.
    pub player: String,
    /// Bid amount, still text; blank for non-bid responses.
    pub note: String,
    pub item_name: String,
    pub item_link: String,
    pub item_id: String,
    pub boss: String,
    pub difficulty: String,
    pub instance: String,
    pub character: String,
    pub response: String,
}

impl LootEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.player.is_empty() {
            return Err(self.empty_field("player"));
        }
        if let Err(problem) = validate_note(&self.note) {
            return Err(ValidationError::InvalidNote {
                id: self.id.clone(),
                timestamp: self.timestamp_str(),
                note: self.note.clone(),
                problem,
            });
        }
        if self.character.is_empty() {
            return Err(self.empty_field("character"));
        }
        if self.response.is_empty() {
            return Err(self.empty_field("response"));
        }
        Ok(())
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(self)
    }

    pub fn is_bid(&self) -> bool {
        self.response == BID_RESPONSE
    }

    /// Points this entry costs; `None` for a blank note.
    pub fn bid_amount(&self) -> Result<Option<u64>, NoteError> {
        parse_note(&self.note)
    }

    pub fn timestamp_str(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    fn empty_field(&self, field: &'static str) -> ValidationError {
        ValidationError::EmptyField {
            id: self.id.clone(),
            timestamp: self.timestamp_str(),
            field,
        }
    }
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(ts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LootEntry {
        LootEntry {
            id: "1".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            player: "somePlayer".to_string(),
            note: "10".to_string(),
            item_name: "item_name".to_string(),
            item_link: "item_link".to_string(),
            item_id: "item_id".to_string(),
            boss: "boss".to_string(),
            difficulty: "difficulty".to_string(),
            instance: "instance".to_string(),
            character: "someCharacter".to_string(),
            response: "someResponse".to_string(),
        }
    }

    #[test]
    fn valid_entry_passes() {
        assert!(entry().validated().is_ok());
    }

    #[test]
    fn empty_player_character_response_rejected() {
        for field in ["player", "character", "response"] {
            let mut e = entry();
            match field {
                "player" => e.player.clear(),
                "character" => e.character.clear(),
                _ => e.response.clear(),
            }
            let err = e.validate().unwrap_err();
            assert!(
                matches!(err, ValidationError::EmptyField { field: f, .. } if f == field),
                "expected EmptyField({field}), got {err:?}"
            );
        }
    }

    #[test]
    fn negative_note_rejected_with_location() {
        let mut e = entry();
        e.note = "-10".to_string();
        let err = e.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid note for entry (id=\"1\", timestamp=\"2024-01-01 20:00:00\"): \
             note must be a parsable integer, but was: \"-10\""
        );
    }

    #[test]
    fn character_fix_writes_export_player_key() {
        let mut raw: RawLootEntry = serde_json::from_value(serde_json::json!({
            "player": "Moppi", "date": "1/1/24", "time": "20:00:00", "id": "1",
            "itemID": 212_456, "response": "Pass", "instance": "Nerub-ar Palace-Heroic",
            "boss": "Ulgrax", "note": "", "itemName": "Ring"
        }))
        .unwrap();
        raw.apply_fix_entry(&FixEntry::new(FixField::Character, "Zelma"));
        let v = serde_json::to_value(&raw).unwrap();
        assert_eq!(v["player"], "Zelma");
        assert!(v.get("character_name").is_none());
        assert_eq!(v["class"], "");
    }
}

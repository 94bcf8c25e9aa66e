//! Fixture builders with defaults a scenario only overrides where it matters.

use chrono::{NaiveDate, NaiveDateTime};

use dkp_schemas::date::{format_timestamp, to_raw_date};
use dkp_schemas::{
    Fix, FixEntry, FixField, LootEntry, Player, Raid, RawLootEntry, Season, BID_RESPONSE,
};

pub const DEFAULT_INSTANCE: &str = "Liberation of Undermine-Heroic";
pub const DEFAULT_BOSS: &str = "Mug'Zee, Heads of Security";

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("invalid fixture date {y}-{m}-{d}"))
}

// ---------------------------------------------------------------------------
// Raw export entries
// ---------------------------------------------------------------------------

/// A pass by `Moppi` on 2024-09-10 20:00:00 unless overridden.
#[derive(Debug, Clone)]
pub struct RawEntryBuilder {
    entry: RawLootEntry,
}

pub fn raw_entry(id: &str) -> RawEntryBuilder {
    RawEntryBuilder {
        entry: RawLootEntry {
            character_name: "Moppi".to_string(),
            date: "10/9/24".to_string(),
            time: "20:00:00".to_string(),
            id: id.to_string(),
            item_id: 212_405,
            item_string: String::new(),
            response: "Pass".to_string(),
            votes: 0,
            class: "PRIEST".to_string(),
            instance: DEFAULT_INSTANCE.to_string(),
            boss: DEFAULT_BOSS.to_string(),
            gear1: String::new(),
            gear2: String::new(),
            response_id: String::new(),
            is_award_reason: "false".to_string(),
            roll_type: "normal".to_string(),
            sub_type: String::new(),
            equip_loc: String::new(),
            note: String::new(),
            owner: String::new(),
            item_name: "Ring of the Fixture".to_string(),
        },
    }
}

impl RawEntryBuilder {
    pub fn character(mut self, name: &str) -> Self {
        self.entry.character_name = name.to_string();
        self
    }

    pub fn day(mut self, date: NaiveDate) -> Self {
        self.entry.date = to_raw_date(date);
        self
    }

    pub fn time(mut self, time: &str) -> Self {
        self.entry.time = time.to_string();
        self
    }

    /// Bid response with `note` as amount.
    pub fn bid(mut self, note: &str) -> Self {
        self.entry.response = BID_RESPONSE.to_string();
        self.entry.note = note.to_string();
        self
    }

    pub fn response(mut self, response: &str) -> Self {
        self.entry.response = response.to_string();
        self
    }

    pub fn note(mut self, note: &str) -> Self {
        self.entry.note = note.to_string();
        self
    }

    pub fn item(mut self, item_id: u64, name: &str) -> Self {
        self.entry.item_id = item_id;
        self.entry.item_name = name.to_string();
        self
    }

    pub fn encounter(mut self, instance: &str, boss: &str) -> Self {
        self.entry.instance = instance.to_string();
        self.entry.boss = boss.to_string();
        self
    }

    pub fn build(self) -> RawLootEntry {
        self.entry
    }
}

// ---------------------------------------------------------------------------
// Clean loot entries
// ---------------------------------------------------------------------------

/// A validated bid of `note` points by `character` (owned by `player`).
pub fn loot_entry(id: &str, player: &str, character: &str, note: &str, timestamp: NaiveDateTime) -> LootEntry {
    let entry = LootEntry {
        id: id.to_string(),
        timestamp,
        player: player.to_string(),
        note: note.to_string(),
        item_name: "Ring of the Fixture".to_string(),
        item_link: "https://www.wowhead.com/item=212405".to_string(),
        item_id: "212405".to_string(),
        boss: "Mug'Zee".to_string(),
        difficulty: "Heroic".to_string(),
        instance: "Liberation of Undermine".to_string(),
        character: character.to_string(),
        response: BID_RESPONSE.to_string(),
    };
    entry
        .validated()
        .unwrap_or_else(|e| panic!("invalid loot fixture at {}: {e}", format_timestamp(&timestamp)))
}

// ---------------------------------------------------------------------------
// Roster, raids, seasons, fixes
// ---------------------------------------------------------------------------

pub fn player(id: u32, name: &str, characters: &[&str]) -> Player {
    Player::new(id, name, characters.iter().copied())
}

pub fn raid(id: u32, date: NaiveDate, attendees: &[&str]) -> Raid {
    Raid::new(id, date, format!("report{id}"), attendees.iter().copied())
}

pub fn season(id: u32, name: &str, start_date: NaiveDate) -> Season {
    Season::new(id, name, format!("{name} fixture"), start_date)
}

pub fn fix(id: &str, entries: &[(FixField, &str)]) -> Fix {
    Fix::new(
        id,
        entries
            .iter()
            .map(|(field, value)| FixEntry::new(*field, *value))
            .collect(),
    )
}

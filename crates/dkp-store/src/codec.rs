//! JSON document codecs.
//!
//! Every collection is stored as a pretty-printed JSON array (two-space
//! indent, UTF-8, non-ASCII kept verbatim) in a fixed order:
//!
//! | document       | order          |
//! |----------------|----------------|
//! | raw loot log   | character name |
//! | players        | name           |
//! | raids          | date           |
//! | seasons        | id             |
//!
//! Sorts are stable, so equal keys keep their input order.

use serde::de::DeserializeOwned;
use serde::Serialize;

use dkp_schemas::{Player, Raid, RawLootEntry, Season};

use crate::StoreError;

fn to_json<T: Serialize>(items: &[T]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(items).map_err(|e| StoreError::Encode {
        message: e.to_string(),
    })
}

fn from_json<T: DeserializeOwned>(path: &str, content: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(content).map_err(|e| StoreError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

pub fn encode_raw_loot(entries: &[RawLootEntry]) -> Result<String, StoreError> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.character_name.cmp(&b.character_name));
    to_json(&sorted)
}

pub fn decode_raw_loot(path: &str, content: &str) -> Result<Vec<RawLootEntry>, StoreError> {
    from_json(path, content)
}

pub fn encode_players(players: &[Player]) -> Result<String, StoreError> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    to_json(&sorted)
}

pub fn decode_players(path: &str, content: &str) -> Result<Vec<Player>, StoreError> {
    from_json(path, content)
}

pub fn encode_raids(raids: &[Raid]) -> Result<String, StoreError> {
    let mut sorted = raids.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    to_json(&sorted)
}

pub fn decode_raids(path: &str, content: &str) -> Result<Vec<Raid>, StoreError> {
    from_json(path, content)
}

pub fn encode_seasons(seasons: &[Season]) -> Result<String, StoreError> {
    let mut sorted = seasons.to_vec();
    sorted.sort_by_key(|s| s.id);
    to_json(&sorted)
}

pub fn decode_seasons(path: &str, content: &str) -> Result<Vec<Season>, StoreError> {
    from_json(path, content)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn players_sorted_by_name_and_non_ascii_kept() {
        let players = vec![
            Player::new(2, "Zoë", ["Zoëlia"]),
            Player::new(1, "Anna", Vec::<String>::new()),
        ];
        let json = encode_players(&players).unwrap();
        assert!(json.find("Anna").unwrap() < json.find("Zoë").unwrap());
        assert!(json.contains("Zoëlia"), "non-ASCII must not be escaped");
        assert!(json.contains("\n  {"), "two-space indent");
    }

    #[test]
    fn raids_sorted_by_date() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let raids = vec![
            Raid::new(2, d(8), "b", ["Olli"]),
            Raid::new(1, d(1), "a", ["Olli"]),
        ];
        let decoded = decode_raids("r", &encode_raids(&raids).unwrap()).unwrap();
        assert_eq!(decoded[0].date, d(1));
    }

    #[test]
    fn decode_error_names_path() {
        let err = decode_players("data/player.json", "{").unwrap_err();
        assert!(err.to_string().starts_with("cannot decode data/player.json"));
    }
}

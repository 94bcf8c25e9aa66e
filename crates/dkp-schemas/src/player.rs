use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// A guild member. Points are tracked per player, loot is looted per character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    #[serde(rename = "chars", alias = "characters", default)]
    pub characters: BTreeSet<String>,
}

impl Player {
    pub fn new<I, S>(id: u32, name: impl Into<String>, characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            characters: characters.into_iter().map(Into::into).collect(),
        }
    }

    pub fn owns(&self, character: &str) -> bool {
        self.characters.contains(character)
    }
}

/// Validated set of players.
///
/// Invariants (checked in [`Roster::new`]):
/// - player names are unique
/// - every character belongs to at most one player
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    players: Vec<Player>,
    /// character -> index into `players`
    by_character: BTreeMap<String, usize>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Result<Self, ValidationError> {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        for p in &players {
            if !names.insert(p.name.as_str()) {
                return Err(ValidationError::DuplicatePlayerName {
                    name: p.name.clone(),
                });
            }
        }

        let mut by_character: BTreeMap<String, usize> = BTreeMap::new();
        for (idx, p) in players.iter().enumerate() {
            for c in &p.characters {
                if let Some(&other) = by_character.get(c) {
                    return Err(ValidationError::CharacterClaimedTwice {
                        character: c.clone(),
                        first: players[other].name.clone(),
                        second: p.name.clone(),
                    });
                }
                by_character.insert(c.clone(), idx);
            }
        }

        Ok(Self {
            players,
            by_character,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The player owning `character`, if any.
    pub fn player_for_character(&self, character: &str) -> Option<&Player> {
        self.by_character
            .get(character)
            .map(|&idx| &self.players[idx])
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn is_known_character(&self, character: &str) -> bool {
        self.by_character.contains_key(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec![
            Player::new(1, "Olli", ["Moppi", "Zelma"]),
            Player::new(2, "Micha", ["Wurzel"]),
        ])
        .unwrap()
    }

    #[test]
    fn character_resolves_to_owner() {
        let r = roster();
        assert_eq!(r.player_for_character("Zelma").unwrap().name, "Olli");
        assert_eq!(r.player_for_character("Wurzel").unwrap().name, "Micha");
        assert!(r.player_for_character("Unknown").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = Roster::new(vec![
            Player::new(1, "Olli", ["Moppi"]),
            Player::new(2, "Olli", ["Wurzel"]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicatePlayerName {
                name: "Olli".to_string()
            }
        );
    }

    #[test]
    fn shared_character_rejected() {
        let err = Roster::new(vec![
            Player::new(1, "Olli", ["Moppi"]),
            Player::new(2, "Micha", ["Moppi"]),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::CharacterClaimedTwice { .. }));
    }

    #[test]
    fn persisted_shape_uses_chars_key() {
        let p = Player::new(3, "Tanja", ["Blair"]);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["chars"][0], "Blair");

        let back: Player =
            serde_json::from_str(r#"{"id":3,"name":"Tanja","characters":["Blair"]}"#).unwrap();
        assert_eq!(back, p);
    }
}

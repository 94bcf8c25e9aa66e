//! Roster, raid and season maintenance.
//!
//! Each operation reads the current document, validates the edited
//! collection as a whole and writes it back with the version it read.
//! The data cache is dropped after every successful write.

use chrono::NaiveDate;
use tracing::info;

use dkp_schemas::{Player, Raid, Roster, Season, SeasonCalendar};
use dkp_store::Versioned;
use dkp_view::AdminView;

use crate::{DkpError, DkpService};

fn non_blank(value: &str, what: &'static str) -> Result<String, DkpError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DkpError::BlankName { what });
    }
    Ok(trimmed.to_string())
}

fn find_player<'a>(players: &'a mut [Player], name: &str) -> Result<&'a mut Player, DkpError> {
    players
        .iter_mut()
        .find(|p| p.name == name)
        .ok_or_else(|| DkpError::UnknownPlayer {
            name: name.to_string(),
        })
}

impl DkpService {
    fn save_roster(&self, players: Versioned<Vec<Player>>) -> Result<(), DkpError> {
        // Rejects duplicate names and doubly claimed characters.
        let roster = Roster::new(players.value)?;
        self.repository()
            .save_players(roster.players(), &players.version)?;
        self.cache().invalidate();
        Ok(())
    }

    /// New player, with the next free id.
    pub fn add_player<I, S>(&self, name: &str, characters: I) -> Result<Player, DkpError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = non_blank(name, "player name")?;
        let characters = characters
            .into_iter()
            .map(|c| non_blank(c.as_ref(), "character name"))
            .collect::<Result<Vec<_>, _>>()?;

        let mut players = self.repository().load_players()?;
        if players.value.iter().any(|p| p.name == name) {
            return Err(DkpError::PlayerNameTaken { name });
        }
        for c in &characters {
            if let Some(owner) = players.value.iter().find(|p| p.owns(c)) {
                return Err(DkpError::CharacterTaken {
                    character: c.clone(),
                    owner: owner.name.clone(),
                });
            }
        }

        let id = players.value.iter().map(|p| p.id).max().map_or(1, |m| m + 1);
        let player = Player::new(id, name, characters);
        players.value.push(player.clone());
        self.save_roster(players)?;
        info!(player = %player.name, id, "player added");
        Ok(player)
    }

    /// Attach a character. A character already owned by anyone is rejected.
    pub fn add_character(&self, player_name: &str, character: &str) -> Result<Player, DkpError> {
        let character = non_blank(character, "character name")?;

        let mut players = self.repository().load_players()?;
        if let Some(owner) = players.value.iter().find(|p| p.owns(&character)) {
            return Err(DkpError::CharacterTaken {
                character,
                owner: owner.name.clone(),
            });
        }
        let player = find_player(&mut players.value, player_name)?;
        player.characters.insert(character.clone());
        let player = player.clone();

        self.save_roster(players)?;
        info!(player = %player.name, %character, "character added");
        Ok(player)
    }

    /// Rename a player and carry their raid attendance over to the new name.
    pub fn rename_player(&self, old_name: &str, new_name: &str) -> Result<Player, DkpError> {
        let new_name = non_blank(new_name, "player name")?;

        let mut players = self.repository().load_players()?;
        if players.value.iter().any(|p| p.name == new_name) {
            return Err(DkpError::PlayerNameTaken { name: new_name });
        }
        let player = find_player(&mut players.value, old_name)?;
        player.name = new_name.clone();
        let player = player.clone();

        let mut raids = self.repository().load_raids()?;
        let mut carried = 0;
        for raid in raids.value.iter_mut() {
            if raid.attendees.remove(old_name) {
                raid.attendees.insert(new_name.clone());
                carried += 1;
            }
        }

        self.save_roster(players)?;
        if carried > 0 {
            self.repository().save_raids(&raids.value, &raids.version)?;
        }
        info!(from = old_name, to = %new_name, raids = carried, "player renamed");
        Ok(player)
    }

    /// Remove a player who never attended a raid.
    pub fn delete_player(&self, name: &str) -> Result<Player, DkpError> {
        let raids = self.repository().load_raids()?;
        let attended = raids.value.iter().filter(|r| r.attended_by(name)).count();
        if attended > 0 {
            return Err(DkpError::PlayerHasAttendance {
                name: name.to_string(),
                raids: attended,
            });
        }

        let mut players = self.repository().load_players()?;
        let pos = players
            .value
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| DkpError::UnknownPlayer {
                name: name.to_string(),
            })?;
        let removed = players.value.remove(pos);

        self.save_roster(players)?;
        info!(player = %removed.name, "player deleted");
        Ok(removed)
    }

    /// Store the raid an admin view describes.
    ///
    /// A raid already stored for that date keeps its id and takes the new
    /// report id and attendees.
    pub fn register_raid(&self, view: &AdminView) -> Result<Raid, DkpError> {
        let mut raids = self.repository().load_raids()?;
        let existing = raids.value.iter().position(|r| r.date == view.date);
        let id = match existing {
            Some(pos) => raids.value[pos].id,
            None => raids.value.iter().map(|r| r.id).max().map_or(1, |m| m + 1),
        };

        let raid = view.to_raid(id).ok_or_else(|| DkpError::AdminViewInvalid {
            validations: view.validations.clone(),
        })?;
        match existing {
            Some(pos) => raids.value[pos] = raid.clone(),
            None => raids.value.push(raid.clone()),
        }

        self.repository().save_raids(&raids.value, &raids.version)?;
        self.cache().invalidate();
        info!(
            date = %raid.date,
            report_id = %raid.report_id,
            attendees = raid.attendees.len(),
            replaced = existing.is_some(),
            "raid registered"
        );
        Ok(raid)
    }

    /// New season starting at `start_date`; it ends where the next one starts.
    pub fn add_season(&self, name: &str, description: &str, start_date: NaiveDate) -> Result<Season, DkpError> {
        let name = non_blank(name, "season name")?;

        let mut seasons = self.repository().load_seasons()?;
        if seasons.value.iter().any(|s| s.name == name) {
            return Err(DkpError::SeasonNameTaken { name });
        }
        let id = seasons.value.iter().map(|s| s.id).max().map_or(1, |m| m + 1);
        let season = Season::new(id, name, description.trim(), start_date);
        seasons.value.push(season.clone());

        let calendar = SeasonCalendar::new(seasons.value);
        self.repository()
            .save_seasons(calendar.seasons(), &seasons.version)?;
        self.cache().invalidate();
        info!(season = %season.name, start = %season.start_date, "season added");
        Ok(season)
    }
}

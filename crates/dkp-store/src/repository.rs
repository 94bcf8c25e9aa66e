//! Typed access to the domain collections.
//!
//! Loads return the value together with the version it was read at; saves
//! require that version back. Writes always carry the full collection.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use dkp_schemas::{Player, Raid, RawLootEntry, Season};

use crate::codec;
use crate::{DocumentStore, StoreError, StoreLayout, VersionTag};

pub const MESSAGE_CREATE: &str = "Create";
pub const MESSAGE_UPDATE: &str = "Update";

/// A loaded value and the store version it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: VersionTag,
}

#[derive(Clone)]
pub struct DkpRepository {
    store: Arc<dyn DocumentStore>,
    layout: StoreLayout,
}

impl DkpRepository {
    pub fn new(store: Arc<dyn DocumentStore>, layout: StoreLayout) -> Self {
        Self { store, layout }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Roster / raids / seasons
    // -----------------------------------------------------------------------

    /// Create empty player/raid/season documents where missing.
    /// Returns the paths created.
    pub fn ensure_collections(&self) -> Result<Vec<String>, StoreError> {
        let mut created = Vec::new();
        for path in [
            self.layout.player_file(),
            self.layout.raid_file(),
            self.layout.season_file(),
        ] {
            if !self.store.exists(&path)? {
                self.store.create(&path, "[]", MESSAGE_CREATE)?;
                created.push(path);
            }
        }
        Ok(created)
    }

    pub fn save_seasons(&self, seasons: &[Season], expected: &VersionTag) -> Result<VersionTag, StoreError> {
        let content = codec::encode_seasons(seasons)?;
        self.store
            .write(&self.layout.season_file(), &content, expected, MESSAGE_UPDATE)
    }

    pub fn load_players(&self) -> Result<Versioned<Vec<Player>>, StoreError> {
        let path = self.layout.player_file();
        let doc = self.store.read(&path)?;
        Ok(Versioned {
            value: codec::decode_players(&path, &doc.content)?,
            version: doc.version,
        })
    }

    pub fn save_players(&self, players: &[Player], expected: &VersionTag) -> Result<VersionTag, StoreError> {
        let content = codec::encode_players(players)?;
        self.store
            .write(&self.layout.player_file(), &content, expected, MESSAGE_UPDATE)
    }

    pub fn load_raids(&self) -> Result<Versioned<Vec<Raid>>, StoreError> {
        let path = self.layout.raid_file();
        let doc = self.store.read(&path)?;
        Ok(Versioned {
            value: codec::decode_raids(&path, &doc.content)?,
            version: doc.version,
        })
    }

    pub fn save_raids(&self, raids: &[Raid], expected: &VersionTag) -> Result<VersionTag, StoreError> {
        let content = codec::encode_raids(raids)?;
        self.store
            .write(&self.layout.raid_file(), &content, expected, MESSAGE_UPDATE)
    }

    pub fn load_seasons(&self) -> Result<Versioned<Vec<Season>>, StoreError> {
        let path = self.layout.season_file();
        let doc = self.store.read(&path)?;
        Ok(Versioned {
            value: codec::decode_seasons(&path, &doc.content)?,
            version: doc.version,
        })
    }

    // -----------------------------------------------------------------------
    // Raw loot logs
    // -----------------------------------------------------------------------

    /// Raid days with a stored log in `season_name`, ascending.
    pub fn list_raid_days(&self, season_name: &str) -> Result<Vec<NaiveDate>, StoreError> {
        let names = match self.store.list(&self.layout.season_dir(season_name)) {
            Ok(names) => names,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        let mut days: Vec<NaiveDate> = names
            .iter()
            .filter_map(|n| StoreLayout::raid_day_of(n))
            .collect();
        days.sort();
        Ok(days)
    }

    /// `None` when no log is stored for that day.
    pub fn load_loot_log(
        &self,
        season_name: &str,
        raid_day: NaiveDate,
    ) -> Result<Option<Versioned<Vec<RawLootEntry>>>, StoreError> {
        let path = self.layout.loot_log_file(season_name, raid_day);
        let doc = match self.store.read(&path) {
            Ok(doc) => doc,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(Some(Versioned {
            value: codec::decode_raw_loot(&path, &doc.content)?,
            version: doc.version,
        }))
    }

    /// Every stored entry of a season, raid days ascending.
    pub fn load_season_logs(&self, season_name: &str) -> Result<Vec<RawLootEntry>, StoreError> {
        let mut all = Vec::new();
        for day in self.list_raid_days(season_name)? {
            if let Some(log) = self.load_loot_log(season_name, day)? {
                all.extend(log.value);
            }
        }
        debug!(season = season_name, entries = all.len(), "season logs loaded");
        Ok(all)
    }

    pub fn create_loot_log(
        &self,
        season_name: &str,
        raid_day: NaiveDate,
        entries: &[RawLootEntry],
    ) -> Result<VersionTag, StoreError> {
        let content = codec::encode_raw_loot(entries)?;
        self.store.create(
            &self.layout.loot_log_file(season_name, raid_day),
            &content,
            MESSAGE_CREATE,
        )
    }

    pub fn update_loot_log(
        &self,
        season_name: &str,
        raid_day: NaiveDate,
        entries: &[RawLootEntry],
        expected: &VersionTag,
    ) -> Result<VersionTag, StoreError> {
        self.write_loot_log(season_name, raid_day, entries, expected, MESSAGE_UPDATE)
    }

    /// Commit a corrected log; the reason is recorded as `Fix: <reason>`.
    pub fn fix_loot_log(
        &self,
        season_name: &str,
        raid_day: NaiveDate,
        entries: &[RawLootEntry],
        expected: &VersionTag,
        reason: &str,
    ) -> Result<VersionTag, StoreError> {
        let message = format!("Fix: {reason}");
        self.write_loot_log(season_name, raid_day, entries, expected, &message)
    }

    fn write_loot_log(
        &self,
        season_name: &str,
        raid_day: NaiveDate,
        entries: &[RawLootEntry],
        expected: &VersionTag,
        message: &str,
    ) -> Result<VersionTag, StoreError> {
        let content = codec::encode_raw_loot(entries)?;
        self.store.write(
            &self.layout.loot_log_file(season_name, raid_day),
            &content,
            expected,
            message,
        )
    }
}

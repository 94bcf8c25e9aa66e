//! Explicit cache of the long-lived collections.
//!
//! Roster, raids and seasons are read once and shared as one immutable
//! [`CachedData`] until [`DataCache::reload`] or [`DataCache::invalidate`].
//! Loot logs are never cached; every request reads them.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use dkp_schemas::{Raid, Roster, SeasonCalendar};
use dkp_store::{DkpRepository, StoreError, Versioned};

use crate::DkpError;

#[derive(Debug, Clone)]
pub struct CachedData {
    pub roster: Roster,
    pub raids: Vec<Raid>,
    pub calendar: SeasonCalendar,
}

impl CachedData {
    fn load(repo: &DkpRepository) -> Result<Self, DkpError> {
        let players = or_empty(repo.load_players())?;
        let raids = or_empty(repo.load_raids())?;
        let seasons = or_empty(repo.load_seasons())?;
        Ok(Self {
            roster: Roster::new(players)?,
            raids,
            calendar: SeasonCalendar::new(seasons),
        })
    }
}

/// A collection document that was never created reads as empty.
fn or_empty<T: Default>(loaded: Result<Versioned<T>, StoreError>) -> Result<T, StoreError> {
    match loaded {
        Ok(v) => Ok(v.value),
        Err(e) if e.is_not_found() => Ok(T::default()),
        Err(e) => Err(e),
    }
}

/// Cloneable handle; clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct DataCache {
    slot: Arc<RwLock<Option<Arc<CachedData>>>>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached data if loaded.
    pub fn peek(&self) -> Option<Arc<CachedData>> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn get_or_load(&self, repo: &DkpRepository) -> Result<Arc<CachedData>, DkpError> {
        if let Some(data) = self.peek() {
            return Ok(data);
        }
        self.reload(repo)
    }

    /// Read everything again and swap it in. On failure the previous data
    /// stays cached.
    pub fn reload(&self, repo: &DkpRepository) -> Result<Arc<CachedData>, DkpError> {
        let next = Arc::new(CachedData::load(repo)?);
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(next.clone());
        info!(
            players = next.roster.len(),
            raids = next.raids.len(),
            seasons = next.calendar.seasons().len(),
            "data cache loaded"
        );
        Ok(next)
    }

    /// Drop the cached data; the next read loads it again.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
        debug!("data cache invalidated");
    }
}

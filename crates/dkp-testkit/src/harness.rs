//! A [`DkpService`] over an in-memory store, seeded through the store API.

use std::sync::Arc;

use anyhow::{Context, Result};

use dkp_config::ConfigHandle;
use dkp_runtime::DkpService;
use dkp_schemas::{Player, Raid, Season};
use dkp_store::{codec, DkpRepository, DocumentStore, InMemoryDocumentStore, StoreLayout, MESSAGE_CREATE};

use crate::ScriptedReportSource;

pub struct Harness {
    pub service: DkpService,
    pub store: Arc<InMemoryDocumentStore>,
    pub reports: Arc<ScriptedReportSource>,
}

impl Harness {
    /// Default configuration, empty store.
    pub fn new(reports: ScriptedReportSource) -> Result<Self> {
        Self::with_config(&[], reports)
    }

    /// Configuration from inline YAML layers.
    pub fn with_config(layers: &[&str], reports: ScriptedReportSource) -> Result<Self> {
        let config = ConfigHandle::from_strings(layers.iter().copied()).context("fixture config")?;
        let store = Arc::new(InMemoryDocumentStore::new());
        let reports = Arc::new(reports);
        let service = DkpService::new(config, store.clone(), reports.clone());
        Ok(Self {
            service,
            store,
            reports,
        })
    }

    /// Write the three collections the way an admin would have created them.
    pub fn seed(&self, seasons: &[Season], players: &[Player], raids: &[Raid]) -> Result<()> {
        let layout: &StoreLayout = self.service.repository().layout();
        let docs = [
            (layout.season_file(), codec::encode_seasons(seasons)?),
            (layout.player_file(), codec::encode_players(players)?),
            (layout.raid_file(), codec::encode_raids(raids)?),
        ];
        for (path, content) in docs {
            self.store
                .create(&path, &content, MESSAGE_CREATE)
                .with_context(|| format!("seed {path}"))?;
        }
        self.service.reload().context("load seeded data")?;
        Ok(())
    }

    pub fn repository(&self) -> &DkpRepository {
        self.service.repository()
    }
}

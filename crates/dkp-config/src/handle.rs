//! Explicit configuration handle.
//!
//! The handle is built once by the embedding process and passed to whoever
//! needs configuration. Snapshots are immutable; `reload()` builds a new one
//! from the same sources and swaps the `Arc`. A reader holds either the old
//! or the new snapshot, never a mix.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::{load_layered_yaml_from_strings, read_layer, DkpConfig};

/// Where layers come from, re-read on every reload.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Files(Vec<PathBuf>),
    Inline(Vec<String>),
}

impl ConfigSource {
    fn read_layers(&self) -> Result<Vec<String>> {
        match self {
            ConfigSource::Files(paths) => paths.iter().map(|p| read_layer(p)).collect(),
            ConfigSource::Inline(docs) => Ok(docs.clone()),
        }
    }
}

/// One fully loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub config: DkpConfig,
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    /// 0 for the initial load, +1 per successful reload.
    pub generation: u64,
}

impl ConfigSnapshot {
    fn load(source: &ConfigSource, generation: u64) -> Result<Self> {
        let layers = source.read_layers()?;
        let refs: Vec<&str> = layers.iter().map(String::as_str).collect();
        let loaded = load_layered_yaml_from_strings(&refs)?;
        let config = DkpConfig::from_json(&loaded.config_json)?;
        Ok(Self {
            config,
            config_hash: loaded.config_hash,
            canonical_json: loaded.canonical_json,
            config_json: loaded.config_json,
            generation,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConfigHandle {
    source: ConfigSource,
    current: Arc<RwLock<Arc<ConfigSnapshot>>>,
}

impl ConfigHandle {
    pub fn load(source: ConfigSource) -> Result<Self> {
        let snapshot = ConfigSnapshot::load(&source, 0)?;
        info!(config_hash = %snapshot.config_hash, "config loaded");
        Ok(Self {
            source,
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        })
    }

    pub fn from_files<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::load(ConfigSource::Files(paths.into_iter().map(Into::into).collect()))
    }

    pub fn from_strings<I, S>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::load(ConfigSource::Inline(docs.into_iter().map(Into::into).collect()))
    }

    /// Current snapshot. Stays valid across later reloads.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Re-read all layers and swap in the result.
    ///
    /// On failure the previous snapshot stays current and the error is returned.
    pub fn reload(&self) -> Result<Arc<ConfigSnapshot>> {
        let generation = self.current().generation + 1;
        let next = match ConfigSnapshot::load(&self.source, generation) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                warn!(error = %e, "config reload failed; keeping previous snapshot");
                return Err(e);
            }
        };

        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        *slot = next.clone();
        info!(config_hash = %next.config_hash, generation, "config reloaded");
        Ok(next)
    }
}

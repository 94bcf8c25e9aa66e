//! dkp-config
//!
//! Layered YAML configuration.
//!
//! - Documents merge in order; later layers override earlier ones, maps merge deeply
//! - The merged document is canonical JSON (sorted keys) with a SHA-256 `config_hash`
//! - Secret-looking literals are refused; config stores env var NAMES only
//! - [`ConfigHandle`] owns the current snapshot and swaps it on `reload()`

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

mod handle;
mod secrets;
mod typed;

pub use handle::{ConfigHandle, ConfigSnapshot, ConfigSource};
pub use secrets::{load_dotenv, resolve_secrets, ResolvedSecrets};
pub use typed::{DkpConfig, LedgerSection, LootSection, ReportKeysEnv, ReportSection, StoreSection};

/// Token prefixes of the credentials this workspace could plausibly be
/// handed: report service OAuth tokens, repository tokens for a git-backed
/// store, cloud keys and PEM blocks.
const SECRET_PREFIXES: &[&str] = &[
    "-----BEGIN",
    "eyJ",
    "ghp_",
    "gho_",
    "ghs_",
    "github_pat_",
    "glpat-",
    "AKIA",
    "sk-",
];

/// Values shorter than this are never treated as tokens.
const MIN_SECRET_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub(crate) fn read_layer(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read config layer {}", path.display()))
}

/// Load YAML layers from files, first file lowest.
pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| read_layer(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let layer: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        if layer.is_null() {
            continue;
        }
        let layer = serde_json::to_value(layer).with_context(|| format!("layer {i} is not representable as json"))?;
        overlay(&mut merged, layer);
    }

    if let Some(pointer) = find_secret_literal(&merged, "") {
        bail!("CONFIG_SECRET_DETECTED leaf={pointer} value=REDACTED");
    }

    // serde_json's default map is ordered, so this string has sorted keys.
    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Apply `layer` on top of `base`: maps merge key by key, anything else replaces.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// JSON pointer of the first string leaf that looks like a token.
fn find_secret_literal(v: &Value, pointer: &str) -> Option<String> {
    match v {
        Value::String(s) if looks_like_secret(s) => Some(if pointer.is_empty() {
            "/".to_string()
        } else {
            pointer.to_string()
        }),
        Value::Object(map) => map.iter().find_map(|(k, child)| {
            let escaped = k.replace('~', "~0").replace('/', "~1");
            find_secret_literal(child, &format!("{pointer}/{escaped}"))
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, child)| find_secret_literal(child, &format!("{pointer}/{i}"))),
        _ => None,
    }
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    t.len() >= MIN_SECRET_LEN && SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

//! Typed view of the merged configuration.
//!
//! ```yaml
//! store:
//!   data_dir: data
//! ledger:
//!   initial_balance: 100
//!   attendance_bonus: 50
//! loot:
//!   item_link_base: "https://www.wowhead.com/item="
//! report:
//!   report_url_base: "https://www.warcraftlogs.com/reports/"
//!   keys_env:
//!     client_id: WCL_CLIENT_ID
//!     client_secret: WCL_CLIENT_SECRET
//! ```
//!
//! Every key is optional; missing keys take the values above.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DkpConfig {
    pub store: StoreSection,
    pub ledger: LedgerSection,
    pub loot: LootSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub data_dir: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    pub initial_balance: i64,
    pub attendance_bonus: i64,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            initial_balance: 100,
            attendance_bonus: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootSection {
    pub item_link_base: String,
}

impl Default for LootSection {
    fn default() -> Self {
        Self {
            item_link_base: "https://www.wowhead.com/item=".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub report_url_base: String,
    pub keys_env: ReportKeysEnv,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            report_url_base: "https://www.warcraftlogs.com/reports/".to_string(),
            keys_env: ReportKeysEnv::default(),
        }
    }
}

/// Env var NAMES holding the report service credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportKeysEnv {
    pub client_id: String,
    pub client_secret: String,
}

impl Default for ReportKeysEnv {
    fn default() -> Self {
        Self {
            client_id: "WCL_CLIENT_ID".to_string(),
            client_secret: "WCL_CLIENT_SECRET".to_string(),
        }
    }
}

impl DkpConfig {
    pub fn from_json(config_json: &Value) -> Result<Self> {
        let cfg: DkpConfig =
            serde_json::from_value(config_json.clone()).context("config does not match the expected shape")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.data_dir.trim().is_empty() {
            bail!("CONFIG_INVALID store.data_dir must not be empty");
        }
        if self.ledger.attendance_bonus < 0 {
            bail!(
                "CONFIG_INVALID ledger.attendance_bonus must be >= 0, got {}",
                self.ledger.attendance_bonus
            );
        }
        if self.loot.item_link_base.trim().is_empty() {
            bail!("CONFIG_INVALID loot.item_link_base must not be empty");
        }
        if self.report.report_url_base.trim().is_empty() {
            bail!("CONFIG_INVALID report.report_url_base must not be empty");
        }
        let keys = &self.report.keys_env;
        for (field, name) in [("client_id", &keys.client_id), ("client_secret", &keys.client_secret)] {
            if !is_env_var_name(name) {
                bail!("CONFIG_INVALID report.keys_env.{field} must name an env var (A-Z, 0-9, _)");
            }
        }
        Ok(())
    }
}

/// `WCL_CLIENT_ID`-style names only; anything else is likely a pasted value.
fn is_env_var_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase() || c == '_')
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_takes_defaults() {
        let cfg = DkpConfig::from_json(&serde_json::json!({})).unwrap();
        assert_eq!(cfg, DkpConfig::default());
        assert_eq!(cfg.ledger.initial_balance, 100);
        assert_eq!(cfg.report.keys_env.client_id, "WCL_CLIENT_ID");
    }

    #[test]
    fn keys_env_must_hold_variable_names() {
        let err = DkpConfig::from_json(&serde_json::json!({
            "report": {"keys_env": {"client_secret": "hunter2 pasted here"}}
        }))
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("report.keys_env.client_secret"), "{msg}");
        assert!(!msg.contains("hunter2"), "{msg}");

        assert!(is_env_var_name("DKP_WCL_SECRET_2"));
        assert!(!is_env_var_name("wcl_secret"));
        assert!(!is_env_var_name(""));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = DkpConfig::from_json(&serde_json::json!({"ledger": {"attendance_bonus": "lots"}}));
        assert!(err.is_err());
    }
}

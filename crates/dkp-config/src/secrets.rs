//! Runtime secret resolution.
//!
//! - Config stores only env var NAMES (`report.keys_env.*`)
//! - Values are read here and nowhere else
//! - `Debug` redacts values; errors name the variable, never the value

use anyhow::{bail, Result};
use tracing::debug;

use crate::DkpConfig;

/// Report service credentials resolved from the environment.
#[derive(Clone)]
pub struct ResolvedSecrets {
    pub client_id_var: String,
    pub client_secret_var: String,
    /// `None` if the named env var was absent or blank.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("client_id_var", &self.client_id_var)
            .field("client_secret_var", &self.client_secret_var)
            .field("client_id", &self.client_id.as_ref().map(|_| "<REDACTED>"))
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl ResolvedSecrets {
    /// Both credentials, or an error naming the first missing variable.
    pub fn report_credentials(&self) -> Result<(&str, &str)> {
        let Some(id) = self.client_id.as_deref() else {
            bail!(
                "SECRETS_MISSING: required env var '{}' (report client id) is not set or empty",
                self.client_id_var
            );
        };
        let Some(secret) = self.client_secret.as_deref() else {
            bail!(
                "SECRETS_MISSING: required env var '{}' (report client secret) is not set or empty",
                self.client_secret_var
            );
        };
        Ok((id, secret))
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Load `.env.local`, then `.env`, into the process environment.
///
/// Variables already set are not overwritten. Missing files are fine.
/// Returns the files that were loaded.
pub fn load_dotenv() -> Vec<&'static str> {
    let mut loaded = Vec::new();
    for file in [".env.local", ".env"] {
        if dotenvy::from_filename(file).is_ok() {
            loaded.push(file);
        }
    }
    debug!(files = ?loaded, "dotenv loaded");
    loaded
}

pub fn resolve_secrets(config: &DkpConfig) -> ResolvedSecrets {
    let keys = &config.report.keys_env;
    ResolvedSecrets {
        client_id: resolve_env(&keys.client_id),
        client_secret: resolve_env(&keys.client_secret),
        client_id_var: keys.client_id.clone(),
        client_secret_var: keys.client_secret.clone(),
    }
}

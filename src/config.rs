//! Configuration for the settlement core

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settlement core configuration
///
/// The core owns no process environment; the surrounding HTTP layer
/// decides where this comes from. `Default` matches the pilot hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name used in log fields
    pub service_name: String,

    /// Hub BIC stamped as `Dbtr/Id/OrgId/BICOrBEI` on every payment group
    pub hub_bic: String,

    /// Creditor contact name used when the directory carries no override
    pub creditor_contact: String,

    /// Optional path to a pain.001 skeleton overriding the embedded one
    pub template_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement-hub".to_string(),
            hub_bic: "CITICIAX".to_string(),
            creditor_contact: "Casablanca JV Org".to_string(),
            template_path: None,
        }
    }
}

impl Config {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }
}

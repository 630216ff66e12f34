use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};

/// How `InitLedger` writes the seed set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitMode {
    /// One put per car, stopping at the first failure. Cars written before
    /// the failure stay in world state.
    #[default]
    Sequential,
    /// A single batch write: either all six cars land or none do.
    Atomic,
}

/// Configuration for the asset contract and its host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractConfig {
    /// Seeding strategy for `InitLedger`.
    pub init_mode: InitMode,
    /// Capacity of event subscriber channels.
    pub event_channel_capacity: usize,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            init_mode: InitMode::Sequential,
            event_channel_capacity: 1024,
        }
    }
}

impl ContractConfig {
    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(raw: &str) -> ContractResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ContractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn load(path: &Path) -> ContractResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ContractError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> ContractResult<()> {
        if self.event_channel_capacity == 0 {
            return Err(ContractError::Config(
                "event_channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

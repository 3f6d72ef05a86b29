//! Resolver configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::amount::MAX_UNIT_DECIMALS;
use crate::error::{MigrationStatusError, MigrationStatusResult};

pub const DEFAULT_SHARE_DECIMALS: u8 = 18;
pub const DEFAULT_FALLBACK_TITLE: &str = "No migration information available";

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fixed-point decimals of the locked-share amount
    pub share_decimals: u8,

    /// Title shown when no status rule matches
    pub fallback_title: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            share_decimals: DEFAULT_SHARE_DECIMALS,
            fallback_title: DEFAULT_FALLBACK_TITLE.into(),
        }
    }
}

impl ResolverConfig {
    pub fn from_toml_str(contents: &str) -> MigrationStatusResult<Self> {
        let config: ResolverConfig =
            toml::from_str(contents).map_err(|e| MigrationStatusError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file, falling back to defaults when it doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> MigrationStatusResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            Ok(ResolverConfig::default())
        }
    }

    pub fn validate(&self) -> MigrationStatusResult<()> {
        if self.share_decimals > MAX_UNIT_DECIMALS {
            return Err(MigrationStatusError::InvalidConfig(format!(
                "share_decimals {} exceeds maximum {}",
                self.share_decimals, MAX_UNIT_DECIMALS
            )));
        }
        Ok(())
    }
}

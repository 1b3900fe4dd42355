//! Configuration Management
//!
//! Handles persistent configuration storage for ncloud-products.

use crate::datasource::IdStrategy;
use crate::ncloud::configuration::Site;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const REGION_ENV: &str = "NCLOUD_REGION";
pub const DEFAULT_REGION: &str = "KR";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Region code sent with every request
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub site: Option<Site>,
    /// API gateway override (same effect as NCLOUD_API_GW)
    #[serde(default)]
    pub api_gw: Option<String>,
    #[serde(default)]
    pub id_strategy: Option<IdStrategy>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ncloud-products").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from a specific file; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Get effective region (CLI > config > NCLOUD_REGION > KR)
    pub fn effective_region(&self, cli: Option<&str>) -> String {
        self.effective_region_with(cli, std::env::var(REGION_ENV).ok())
    }

    /// Same as [`Config::effective_region`] with the `NCLOUD_REGION` value given
    pub fn effective_region_with(&self, cli: Option<&str>, env_region: Option<String>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.region.clone())
            .or_else(|| env_region.filter(|r| !r.is_empty()))
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// Get effective site (CLI > config > public)
    pub fn effective_site(&self, cli: Option<Site>) -> Site {
        cli.or(self.site).unwrap_or_default()
    }

    pub fn effective_id_strategy(&self) -> IdStrategy {
        self.id_strategy.unwrap_or_default()
    }
}

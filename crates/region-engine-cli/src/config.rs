use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use region_engine::{Region, RegionConfig};
use serde::Deserialize;
use tracing::{debug, info};

use crate::cli::Cli;

/// Top-level regcal configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Region used by every command unless a flag overrides part of it.
    #[serde(default)]
    pub default_region: RegionConfig,
}

impl EngineConfig {
    /// Read a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Resolve the region for this invocation: config file first, then flags.
pub fn load(cli: &Cli) -> Result<Region> {
    let mut config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };

    let region_config = &mut config.default_region;
    if let Some(calendar) = &cli.calendar {
        region_config.calendar = calendar.clone();
    }
    if let Some(timezone) = &cli.timezone {
        region_config.timezone = timezone.clone();
    }
    if let Some(locale) = &cli.locale {
        region_config.locale = locale.clone();
    }
    debug!(?region_config, "resolved region");

    region_config.to_region().context("invalid region")
}

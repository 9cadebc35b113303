//! Config file loading for the CLI.
//!
//! The file is a [`NavConfig`] with an optional `arena:` section for the
//! simulator. Validation is left to the commands that consume it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use wallbot_core::{ArenaConfig, NavConfig};

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "wallbot.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub nav: NavConfig,

    pub arena: ArenaConfig,
}

impl FileConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config")
    }

    pub fn validate(&self) -> Result<()> {
        self.nav.validate()?;
        self.arena.validate()?;
        Ok(())
    }
}

/// Loads `explicit`, else `wallbot.yml` if present, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    match explicit {
        Some(path) => load_from(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                load_from(path)
            } else {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(FileConfig::default())
            }
        }
    }
}

fn load_from(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = FileConfig::from_yaml(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::ConfigStore;
use crate::domain::config::{CONFIG_ENV, DEFAULT_CONFIG_PATH, WifiprovConfig, validate_config};

/// Production implementation of `ConfigStore` that reads a YAML file.
///
/// A missing file yields the defaults; a present file is parsed then
/// validated.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Pick the config location: explicit flag, then `WIFIPROV_CONFIG`, then
    /// the system default.
    #[must_use]
    pub fn resolve(flag: Option<&Path>) -> Self {
        if let Some(path) = flag {
            return Self::new(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(val) if !val.is_empty() => Self::new(val),
            _ => Self::new(DEFAULT_CONFIG_PATH),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<WifiprovConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(WifiprovConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        // An empty file deserializes to `null`, which means "all defaults".
        let config: WifiprovConfig = if content.trim().is_empty() {
            WifiprovConfig::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", self.path.display()))?
        };
        validate_config(&config).with_context(|| format!("invalid {}", self.path.display()))?;
        Ok(config)
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

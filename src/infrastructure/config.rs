// src/infrastructure/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{API_URL_ENV, DEFAULT_TIMEOUT_SECS};

/// TOML configuration file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Backend base URL, used when neither the flag nor the environment set one
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: default_timeout_secs(),
            storage_path: None,
        }
    }
}

/// Effective runtime settings, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub storage_path: PathBuf,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                debug!(?path, "Loading config file");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Default location, e.g. `~/.config/ainotes/config.toml` on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ainotes").join("config.toml"))
    }

    /// Combine with command line overrides; the base URL is mandatory
    pub fn resolve(
        &self,
        api_url: Option<String>,
        storage_path: Option<PathBuf>,
    ) -> Result<Settings> {
        let api_url = api_url
            .or_else(|| self.api_url.clone())
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .with_context(|| {
                format!(
                    "No backend URL configured. \
                     Pass --api-url, set {API_URL_ENV} or add api_url to the config file"
                )
            })?;

        Ok(Settings {
            api_url,
            timeout: Duration::from_secs(self.timeout_secs),
            storage_path: self.resolve_storage_path(storage_path)?,
        })
    }

    /// Credential cache location: override, then config file, then data dir
    pub fn resolve_storage_path(&self, storage_path: Option<PathBuf>) -> Result<PathBuf> {
        storage_path
            .or_else(|| self.storage_path.clone())
            .or_else(default_storage_path)
            .context("Could not determine a data directory for the credential cache")
    }
}

/// e.g. `~/.local/share/ainotes/local_storage.json` on Linux
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("ainotes").join("local_storage.json"))
}

//! Configuration
//!
//! Settings come from an optional TOML file, then the environment, then
//! command-line flags (applied by the binary), each overriding the last.

use crate::error::{Error, Result};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable naming the database file
pub const DATABASE_ENV: &str = "SQLITE_URL";

const DEFAULT_WINDOW_DAYS: u32 = 7;
const DEFAULT_ASSET_BASE_URL: &str = "https://discord.com/assets/";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// How many days of history the recent builds view covers
    pub window_days: u32,
    /// Base URL asset names are resolved against
    pub asset_base_url: Url,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("spectacles.db"),
        |dir| dir.join("spectacles").join("spectacles.db"),
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            window_days: DEFAULT_WINDOW_DAYS,
            asset_base_url: Url::parse(DEFAULT_ASSET_BASE_URL)
                .expect("hardcoded asset base URL is valid"),
        }
    }
}

impl Config {
    /// Load configuration from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DATABASE_ENV).filter(|p| !p.is_empty()) {
            self.database_path = PathBuf::from(path);
        }
    }

    fn validate(&mut self) -> Result<()> {
        if self.window_days == 0 {
            return Err(Error::Config("window_days must be at least 1".to_string()));
        }
        if self.asset_base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "asset_base_url cannot be a base: {}",
                self.asset_base_url
            )));
        }
        // Url::join replaces the last segment unless the path ends in a slash.
        if !self.asset_base_url.path().ends_with('/') {
            let path = format!("{}/", self.asset_base_url.path());
            self.asset_base_url.set_path(&path);
        }
        Ok(())
    }

    /// History window as a duration
    pub fn window(&self) -> Duration {
        Duration::days(i64::from(self.window_days))
    }

    /// Public URL of an asset
    pub fn asset_url(&self, name: &str) -> Result<Url> {
        self.asset_base_url
            .join(name)
            .map_err(|e| Error::Parse(format!("invalid asset name {name}: {e}")))
    }
}

//! # Configuration
//!
//! Runtime configuration loaded from an optional YAML file and environment
//! variables. Environment variables always win over the file.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Optional YAML overlay via CONFIG_PATH
//! - 1.0.0: Environment-only configuration

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;

pub const DEFAULT_DATABASE_PATH: &str = "plantastic.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
/// Longest accepted scheduler day, one calendar year
pub const MAX_REMINDER_DAY_SECS: u64 = 365 * SECONDS_PER_DAY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file backing the key-value store
    pub database_path: String,
    /// External catalog document; `None` uses the bundled one
    pub catalog_path: Option<String>,
    pub log_level: String,
    /// Length of one scheduler day in seconds
    pub reminder_day_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            catalog_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            reminder_day_secs: SECONDS_PER_DAY,
        }
    }
}

/// Shape of the optional YAML file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database_path: Option<String>,
    catalog_path: Option<String>,
    log_level: Option<String>,
    reminder_day_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("CONFIG_PATH") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Config::default(),
        };

        if let Ok(path) = env::var("DATABASE_PATH") {
            config.database_path = path;
        }
        if let Ok(path) = env::var("CATALOG_PATH") {
            config.catalog_path = Some(path);
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        if let Ok(raw) = env::var("REMINDER_DAY_SECS") {
            config.reminder_day_secs = parse_day_secs(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, filling unspecified fields with defaults
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let file: FileConfig = serde_yaml::from_str(contents)?;
        let defaults = Config::default();

        let config = Config {
            database_path: file.database_path.unwrap_or(defaults.database_path),
            catalog_path: file.catalog_path.or(defaults.catalog_path),
            log_level: file.log_level.unwrap_or(defaults.log_level),
            reminder_day_secs: file.reminder_day_secs.unwrap_or(defaults.reminder_day_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.trim().is_empty() {
            return Err(anyhow!("DATABASE_PATH must not be empty"));
        }
        if self.reminder_day_secs == 0 {
            return Err(anyhow!("REMINDER_DAY_SECS must be a positive integer"));
        }
        if self.reminder_day_secs > MAX_REMINDER_DAY_SECS {
            return Err(anyhow!(
                "REMINDER_DAY_SECS {} exceeds the maximum of {}",
                self.reminder_day_secs,
                MAX_REMINDER_DAY_SECS
            ));
        }
        Ok(())
    }
}

fn parse_day_secs(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| anyhow!("Invalid REMINDER_DAY_SECS '{}': {}", raw, e))
}

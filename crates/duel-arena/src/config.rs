//! Configuration file loading for the arena.
//!
//! This module provides types and functions for loading and validating
//! arena configuration from TOML files.

use duel_core::{PairStrategy, TournamentRules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
///
/// This enum covers file I/O errors, TOML parsing errors, and
/// validation errors for rule values that make no sense.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A value is outside its allowed range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Main arena configuration structure.
///
/// Uses `arena.toml` in the current directory by default. Every field has a
/// default, so an empty or missing file is a valid configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArenaConfig {
    /// JSON catalog of `{id, url, elo}` records.
    /// Defaults to "data/catalog.json".
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// SQLite database holding the persisted session.
    /// Defaults to "data/arena.db".
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Pairing strategy used by `play`. Defaults to least-played.
    #[serde(default)]
    pub strategy: PairStrategy,
    /// Rating and phase rules.
    #[serde(default)]
    pub rules: TournamentRules,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/catalog.json")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/arena.db")
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            database_path: default_database_path(),
            strategy: PairStrategy::default(),
            rules: TournamentRules::default(),
        }
    }
}

impl ArenaConfig {
    /// Loads the arena configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if the file contains invalid TOML, or
    /// [`ConfigError::Invalid`] if a rule value is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses and validates configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("arena.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rules.k_factor.is_finite() && self.rules.k_factor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "k_factor must be positive, got {}",
                self.rules.k_factor
            )));
        }
        if self.rules.finalists_count == 0 {
            return Err(ConfigError::Invalid(
                "finalists_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

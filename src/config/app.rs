//! Main application configuration
//!
//! This module defines the primary configuration structures for the camp
//! rating tracker, including environment variable and TOML file loading and
//! validation.

use crate::config::{RatingConfig, StatsSettings};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub rating: RatingConfig,
    pub stats: StatsSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where the player store and match log live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding both data files
    pub data_dir: PathBuf,
    /// Player store file name, relative to `data_dir`
    pub players_file: String,
    /// Match log file name, relative to `data_dir`
    pub history_file: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "elo-camp".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            players_file: "players.json".to_string(),
            history_file: "matches.jsonl".to_string(),
        }
    }
}

impl StorageSettings {
    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(&self.players_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(log_level) = env::var("CAMP_LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Storage settings
        if let Ok(dir) = env::var("CAMP_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(file) = env::var("CAMP_PLAYERS_FILE") {
            self.storage.players_file = file;
        }
        if let Ok(file) = env::var("CAMP_HISTORY_FILE") {
            self.storage.history_file = file;
        }

        // Rating settings
        if let Ok(k) = env::var("CAMP_K_BASE") {
            self.rating.k_base = k
                .parse()
                .map_err(|_| anyhow!("Invalid CAMP_K_BASE value: {}", k))?;
        }
        if let Ok(k) = env::var("CAMP_K_MATCH_SINGLES") {
            self.rating.k_match_singles = k
                .parse()
                .map_err(|_| anyhow!("Invalid CAMP_K_MATCH_SINGLES value: {}", k))?;
        }
        if let Ok(k) = env::var("CAMP_K_MATCH_DOUBLES") {
            self.rating.k_match_doubles = k
                .parse()
                .map_err(|_| anyhow!("Invalid CAMP_K_MATCH_DOUBLES value: {}", k))?;
        }
        if let Ok(alpha) = env::var("CAMP_ALPHA_MOV") {
            self.rating.alpha_mov = alpha
                .parse()
                .map_err(|_| anyhow!("Invalid CAMP_ALPHA_MOV value: {}", alpha))?;
        }
        if let Ok(initial) = env::var("CAMP_INITIAL_RATING") {
            self.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid CAMP_INITIAL_RATING value: {}", initial))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate storage settings
    if config.storage.players_file.is_empty() {
        return Err(anyhow!("Players file name cannot be empty"));
    }
    if config.storage.history_file.is_empty() {
        return Err(anyhow!("History file name cannot be empty"));
    }
    if config.storage.players_path() == config.storage.history_path() {
        return Err(anyhow!("Players file and history file must differ"));
    }

    config.rating.validate()?;

    // Validate stats settings
    if config.stats.recent_form_len == 0 {
        return Err(anyhow!("Recent form length must be greater than 0"));
    }
    if config.stats.default_momentum_last == 0 {
        return Err(anyhow!("Default momentum window must be greater than 0"));
    }
    if !(0.0..=1.0).contains(&config.stats.upset_expectation) {
        return Err(anyhow!("Upset expectation must be between 0 and 1"));
    }

    Ok(())
}

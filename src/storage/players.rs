//! Player store interface and implementations
//!
//! This module defines how the player registry is persisted, with in-memory,
//! JSON file and mock implementations.

use crate::error::CampError;
use crate::registry::PlayerRegistry;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Trait for player store operations
pub trait PlayerStore {
    /// Load the whole registry; a store that was never written loads empty
    fn load_players(&self) -> crate::error::Result<PlayerRegistry>;

    /// Replace the stored registry
    fn save_players(&mut self, registry: &PlayerRegistry) -> crate::error::Result<()>;
}

/// In-memory player store
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    registry: PlayerRegistry,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing registry
    pub fn with_registry(registry: PlayerRegistry) -> Self {
        Self { registry }
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn load_players(&self) -> crate::error::Result<PlayerRegistry> {
        Ok(self.registry.clone())
    }

    fn save_players(&mut self, registry: &PlayerRegistry) -> crate::error::Result<()> {
        self.registry = registry.clone();
        Ok(())
    }
}

/// Player store backed by a pretty-printed JSON object keyed by name
#[derive(Debug, Clone)]
pub struct JsonPlayerStore {
    path: PathBuf,
}

impl JsonPlayerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "players.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PlayerStore for JsonPlayerStore {
    fn load_players(&self) -> crate::error::Result<PlayerRegistry> {
        if !self.path.exists() {
            debug!("Player store {} not found, starting empty", self.path.display());
            return Ok(PlayerRegistry::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read player store {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(PlayerRegistry::new());
        }

        let registry: PlayerRegistry =
            serde_json::from_str(&contents).map_err(|e| CampError::Storage {
                message: format!("Corrupt player store {}: {}", self.path.display(), e),
            })?;

        debug!(
            "Loaded {} players from {}",
            registry.len(),
            self.path.display()
        );
        Ok(registry)
    }

    fn save_players(&mut self, registry: &PlayerRegistry) -> crate::error::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(registry)?;
        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)
                .with_context(|| format!("Failed to create {}", temp.display()))?;
            file.write_all(json.as_bytes())
                .and_then(|_| file.write_all(b"\n"))
                .and_then(|_| file.sync_all())
                .with_context(|| format!("Failed to write {}", temp.display()))?;
        }
        fs::rename(&temp, &self.path).with_context(|| {
            format!(
                "Failed to move {} over {}",
                temp.display(),
                self.path.display()
            )
        })?;

        info!(
            "Saved {} players to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Mock player store for testing
#[derive(Debug, Default)]
pub struct MockPlayerStore {
    registry: PlayerRegistry,
    save_calls: Vec<PlayerRegistry>,
    fail_saves: bool,
}

impl MockPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save fail with a storage error
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Registries passed to successful saves, oldest first
    pub fn save_calls(&self) -> &[PlayerRegistry] {
        &self.save_calls
    }

    pub fn preset_registry(&mut self, registry: PlayerRegistry) {
        self.registry = registry;
    }
}

impl PlayerStore for MockPlayerStore {
    fn load_players(&self) -> crate::error::Result<PlayerRegistry> {
        Ok(self.registry.clone())
    }

    fn save_players(&mut self, registry: &PlayerRegistry) -> crate::error::Result<()> {
        if self.fail_saves {
            return Err(CampError::Storage {
                message: "mock player store refused the save".to_string(),
            }
            .into());
        }
        self.save_calls.push(registry.clone());
        self.registry = registry.clone();
        Ok(())
    }
}

//! Buffer configuration
//!
//! Stored in `~/.config/linebuf/config.yaml`. Every field is optional; missing
//! fields fall back to their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the line cache is repaired after a positional edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    /// Drop every line start from the edited line on and rescan the document tail
    #[default]
    Rescan,
    /// Move downstream line starts by the edit's byte delta; only the edited
    /// bytes are scanned
    Shift,
}

/// Tunables for a `LineIndexedBuffer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Line cache repair strategy
    #[serde(default)]
    pub cache_strategy: CacheStrategy,

    /// Initial capacity of the buffer used to hand out single lines
    #[serde(default = "default_scratch_capacity")]
    pub scratch_capacity: usize,
}

fn default_scratch_capacity() -> usize {
    256
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            cache_strategy: CacheStrategy::default(),
            scratch_capacity: default_scratch_capacity(),
        }
    }
}

impl BufferConfig {
    /// Load config from the user config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config as YAML
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

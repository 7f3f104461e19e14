//! Configuration paths for linebuf
//!
//! linebuf keeps two things here: `config.yaml` (buffer settings) and the
//! `logs/` directory written by the replay binary. Both live under:
//! - Unix/macOS: `~/.config/linebuf/`
//! - Windows: `%APPDATA%\linebuf\`

use anyhow::{Context, Result};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "linebuf";

/// Base config directory for linebuf
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/linebuf`
///   - Else: `~/.config/linebuf`
///
/// Windows:
///   - `%APPDATA%\linebuf`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/linebuf/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/linebuf/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir().context("No config directory available")?;
    ensure_dir(&logs)?;
    Ok(logs)
}

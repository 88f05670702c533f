//! Game settings and preferences
//!
//! Persisted separately from the ranking as a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded in the ranking
    pub player_name: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Files ===
    /// Flat-text ranking file
    pub ranking_path: PathBuf,
    /// Optional balance override file
    pub tuning_path: Option<PathBuf>,

    /// Fixed RNG seed (random per run when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: crate::consts::DEFAULT_PLAYER_NAME.to_string(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,

            ranking_path: PathBuf::from("ranking.txt"),
            tuning_path: None,

            seed: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn read(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_read() {
        let path = std::env::temp_dir().join(format!(
            "recycle_rush_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            player_name: "Ana".to_string(),
            seed: Some(42),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::read(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_garbage_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "recycle_rush_bad_settings_{}.json",
            std::process::id()
        ));
        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }
}

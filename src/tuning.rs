//! Data-driven game balance
//!
//! Every balance knob lives in [`Tuning`]. Defaults reproduce the shipped
//! game; a JSON file can override any subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Misses allowed before game over
    pub max_misses: u32,
    /// Hard cap on simultaneously falling entities
    pub max_entities: usize,

    // === Fall speed (units/s) ===
    pub initial_min_speed: f32,
    /// Width of the random speed band above the minimum
    pub initial_speed_offset: f32,
    /// Base speed gain per tier (scaled by tier)
    pub speed_increase_rate: f32,
    pub max_speed: f32,

    // === Progression ===
    /// Score needed for the first tier-up
    pub initial_threshold: u32,
    /// Geometric growth of the threshold step per tier
    pub threshold_growth: f32,
    /// Ticks between spawns at tier 1
    pub spawn_delay_initial: u32,
    pub spawn_delay_min: u32,

    // === Ranking ===
    /// Entries shown on screen
    pub ranking_display: usize,
    /// Entries kept on disk (None = keep everything)
    pub ranking_storage_cap: Option<usize>,
    pub max_name_len: usize,

    // === Animation (seconds) ===
    pub gameover_duration: f32,
    pub home_duration: f32,
    /// Fraction of the game-over animation before overlays appear
    pub gameover_overlay_threshold: f32,

    // === Particles ===
    pub ambient_count: usize,
    pub cascade_max_particles: usize,
    /// Seconds between cascade spawns
    pub cascade_spawn_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_misses: 8,
            max_entities: 6,

            initial_min_speed: 0.25,
            initial_speed_offset: 0.125,
            speed_increase_rate: 0.009375,
            max_speed: 2.1875,

            initial_threshold: 3,
            threshold_growth: 1.4,
            spawn_delay_initial: 120,
            spawn_delay_min: 30,

            ranking_display: 5,
            ranking_storage_cap: None,
            max_name_len: 15,

            gameover_duration: 1.5,
            home_duration: 2.0,
            gameover_overlay_threshold: 0.7,

            ambient_count: 50,
            cascade_max_particles: 300,
            cascade_spawn_interval: 0.032,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load from `path` if given, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_misses == 0 {
            return Err(out_of_range("max_misses", 0.0, "[1, ∞)"));
        }
        if self.max_entities == 0 {
            return Err(out_of_range("max_entities", 0.0, "[1, ∞)"));
        }
        if self.initial_min_speed <= 0.0 || self.initial_min_speed > self.max_speed {
            return Err(out_of_range(
                "initial_min_speed",
                self.initial_min_speed as f64,
                "(0, max_speed]",
            ));
        }
        if self.initial_speed_offset < 0.0 {
            return Err(out_of_range(
                "initial_speed_offset",
                self.initial_speed_offset as f64,
                "[0, ∞)",
            ));
        }
        if self.threshold_growth < 1.0 {
            return Err(out_of_range(
                "threshold_growth",
                self.threshold_growth as f64,
                "[1, ∞)",
            ));
        }
        if self.initial_threshold == 0 {
            return Err(out_of_range("initial_threshold", 0.0, "[1, ∞)"));
        }
        if self.spawn_delay_min == 0 || self.spawn_delay_min > self.spawn_delay_initial {
            return Err(out_of_range(
                "spawn_delay_min",
                self.spawn_delay_min as f64,
                "[1, spawn_delay_initial]",
            ));
        }
        if self.gameover_duration <= 0.0 {
            return Err(out_of_range(
                "gameover_duration",
                self.gameover_duration as f64,
                "(0, ∞)",
            ));
        }
        if self.cascade_spawn_interval <= 0.0 {
            return Err(out_of_range(
                "cascade_spawn_interval",
                self.cascade_spawn_interval as f64,
                "(0, ∞)",
            ));
        }
        Ok(())
    }
}

fn out_of_range(name: &'static str, value: f64, safe_range: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        name,
        value,
        safe_range,
    }
}

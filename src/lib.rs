//! Recycle Rush - A falling-waste sorting arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, particles, game state)
//! - `ranking`: Score-sorted leaderboard and its persistence seam
//! - `audio`: Audio cue types and the host-side dispatcher
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod category;
pub mod error;
pub mod ranking;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use category::Category;
pub use ranking::{MemoryStore, Ranking, RankingEntry, RankingStore, TextFileStore};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal tick length in seconds (the host drives ~62.5 Hz)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield horizontal bounds (normalized units)
    pub const PLAYFIELD_LEFT: f32 = -1.0;
    pub const PLAYFIELD_RIGHT: f32 = 1.0;
    /// Top of the visible area; entities spawn at or above it
    pub const VISIBLE_TOP: f32 = 1.0;
    /// Ground line: anything whose lower edge passes it is missed
    pub const FLOOR_Y: f32 = -0.8;

    /// Falling entity defaults
    pub const ENTITY_SIZE: f32 = 0.12;
    pub const ENTITY_SPAWN_BAND: f32 = 0.5;
    /// Angular rate scale: degrees of spin per unit of fall speed
    pub const ENTITY_SPIN_PER_SPEED: f32 = 100.0;

    /// Collector defaults
    pub const COLLECTOR_WIDTH: f32 = 0.3;
    pub const COLLECTOR_HEIGHT: f32 = 0.2;
    pub const COLLECTOR_SPEED: f32 = 3.125;

    /// Player name used when none was entered
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Wrap a coordinate into [-half, half], re-entering from the opposite edge
#[inline]
pub fn wrap_coord(value: f32, half: f32) -> f32 {
    if value > half {
        -half
    } else if value < -half {
        half
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle() {
        use std::f32::consts::TAU;
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_coord_reenters_opposite_edge() {
        assert_eq!(wrap_coord(2.3, 2.2), -2.2);
        assert_eq!(wrap_coord(-2.3, 2.2), 2.2);
        assert_eq!(wrap_coord(1.0, 2.2), 1.0);
    }
}

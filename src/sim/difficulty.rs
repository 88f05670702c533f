//! Difficulty progression
//!
//! A pure function of cumulative score. Each time the score reaches the
//! current threshold the tier goes up by one and every knob moves toward
//! "harder": faster falls, shorter spawn delay, more simultaneous entities.
//! Thresholds grow geometrically.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Multiplier gain per tier above 1
const MULTIPLIER_PER_TIER: f32 = 0.4;
/// Speed boost scaling per tier
const BOOST_PER_TIER: f32 = 0.5;
/// Entities allowed at tier 1, before tier bonuses
const BASE_ENTITIES: usize = 2;
/// Most entities tier bonuses can add
const MAX_TIER_ENTITY_BONUS: usize = 4;

/// Difficulty parameters for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Current tier (1-based)
    pub tier: u32,
    /// Slowest possible fall speed (units/s)
    pub min_speed: f32,
    /// Random speed band above `min_speed`
    pub speed_offset: f32,
    /// Ticks between spawns
    pub spawn_delay: u32,
    /// Active entity cap
    pub max_entities: usize,
    /// Score that triggers the next tier
    pub next_threshold: u32,
    /// Spawn-rate multiplier
    pub multiplier: f32,
}

impl Difficulty {
    /// Tier 1 parameters
    pub fn initial(tuning: &Tuning) -> Self {
        Self {
            tier: 1,
            min_speed: tuning.initial_min_speed,
            speed_offset: tuning.initial_speed_offset,
            spawn_delay: tuning.spawn_delay_initial,
            max_entities: entity_cap(1, tuning.max_entities),
            next_threshold: tuning.initial_threshold,
            multiplier: 1.0,
        }
    }

    /// Parameters after `tier - 1` consecutive tier-ups from tier 1
    pub fn at_tier(tier: u32, tuning: &Tuning) -> Self {
        let mut difficulty = Self::initial(tuning);
        while difficulty.tier < tier {
            difficulty = difficulty.next_tier(tuning);
        }
        difficulty
    }

    /// New parameters if `score` crossed the threshold, otherwise `None`
    pub fn advance(&self, score: u32, tuning: &Tuning) -> Option<Self> {
        (score >= self.next_threshold).then(|| self.next_tier(tuning))
    }

    /// Speed range new entities draw from
    pub fn speed_range(&self) -> (f32, f32) {
        (self.min_speed, self.min_speed + self.speed_offset)
    }

    /// Whether a spawn is due after `ticks` ticks without one
    pub fn spawn_due(&self, ticks: u32) -> bool {
        ticks >= self.spawn_delay
    }

    fn next_tier(&self, tuning: &Tuning) -> Self {
        let tier = self.tier + 1;
        let multiplier = 1.0 + (tier - 1) as f32 * MULTIPLIER_PER_TIER;
        let boost = tuning.speed_increase_rate * (1.0 + tier as f32 * BOOST_PER_TIER);

        let mut min_speed = self.min_speed;
        if min_speed < tuning.max_speed {
            min_speed = (min_speed + boost).min(tuning.max_speed);
        }

        let offset_cap = tuning.max_speed * 0.5;
        let mut speed_offset = self.speed_offset;
        if speed_offset < offset_cap {
            speed_offset = (speed_offset + boost * 0.5).min(offset_cap);
        }

        let spawn_delay = ((tuning.spawn_delay_initial as f32 / (1.0 + multiplier * 0.5)) as u32)
            .max(tuning.spawn_delay_min);

        let step = (tuning.initial_threshold as f32
            * tuning.threshold_growth.powi(tier as i32 - 1)) as u32;

        Self {
            tier,
            min_speed,
            speed_offset,
            // Never slower than the previous tier, even with odd tuning
            spawn_delay: spawn_delay.min(self.spawn_delay),
            max_entities: entity_cap(tier, tuning.max_entities).max(self.max_entities),
            next_threshold: self.next_threshold.saturating_add(step.max(1)),
            multiplier,
        }
    }
}

fn entity_cap(tier: u32, hard_cap: usize) -> usize {
    let bonus = (tier as usize / 2).min(MAX_TIER_ENTITY_BONUS);
    (BASE_ENTITIES + bonus).min(hard_cap).max(1)
}

//! Falling entities
//!
//! The manager owns a collection that only grows (up to the tier cap) during a
//! session. Entities are never removed: a caught or missed entity is recycled
//! in place with fresh random state.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::category::Category;
use crate::consts::*;

/// A falling, categorized piece of waste
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingEntity {
    /// Center position
    pub pos: Vec2,
    /// Orientation (radians)
    pub angle: f32,
    /// Angular rate (radians/s)
    pub angular_vel: f32,
    /// Fall speed (units/s, positive is downward)
    pub speed: f32,
    /// Diameter
    pub size: f32,
    pub category: Category,
}

impl FallingEntity {
    /// Create an entity with random placement drawn from `difficulty`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, difficulty: &Difficulty) -> Self {
        let mut entity = Self {
            pos: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            speed: 0.0,
            size: ENTITY_SIZE,
            category: Category::default(),
        };
        entity.respawn(rng, difficulty);
        entity
    }

    /// Reassign random state in place
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, difficulty: &Difficulty) {
        let (min_speed, max_speed) = difficulty.speed_range();
        self.pos = Vec2::new(
            rng.random_range(PLAYFIELD_LEFT..=PLAYFIELD_RIGHT),
            VISIBLE_TOP + rng.random::<f32>() * ENTITY_SPAWN_BAND,
        );
        self.speed = if max_speed > min_speed {
            rng.random_range(min_speed..=max_speed)
        } else {
            min_speed
        };
        self.angle = rng.random_range(0.0..std::f32::consts::TAU);
        self.angular_vel =
            rng.random_range(-1.0f32..=1.0) * self.speed * ENTITY_SPIN_PER_SPEED.to_radians();
        self.category = rng.random();
    }

    /// Advance fall and spin
    pub fn advance(&mut self, dt: f32) {
        self.pos.y -= self.speed * dt;
        self.angle = crate::wrap_angle(self.angle + self.angular_vel * dt);
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.size / 2.0
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }

    /// Lower edge
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.size / 2.0
    }
}

/// Owns the active falling entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallingEntityManager {
    entities: Vec<FallingEntity>,
    /// Ticks since the last spawn
    spawn_ticks: u32,
}

impl FallingEntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &[FallingEntity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [FallingEntity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ticks accumulated toward the next spawn
    pub fn spawn_ticks(&self) -> u32 {
        self.spawn_ticks
    }

    /// Append one random entity if below the cap. Returns whether one was added.
    pub fn spawn_one<R: Rng + ?Sized>(&mut self, rng: &mut R, difficulty: &Difficulty) -> bool {
        if self.entities.len() >= difficulty.max_entities {
            return false;
        }
        self.entities.push(FallingEntity::random(rng, difficulty));
        true
    }

    /// Count a tick toward the spawn delay and spawn when due
    pub fn tick_spawner<R: Rng + ?Sized>(&mut self, rng: &mut R, difficulty: &Difficulty) -> bool {
        self.spawn_ticks = self.spawn_ticks.saturating_add(1);
        if difficulty.spawn_due(self.spawn_ticks) && self.spawn_one(rng, difficulty) {
            self.spawn_ticks = 0;
            return true;
        }
        false
    }

    /// Advance every entity
    pub fn tick(&mut self, dt: f32) {
        for entity in &mut self.entities {
            entity.advance(dt);
        }
    }

    /// Reset entity `index` with fresh random state
    pub fn recycle<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R, difficulty: &Difficulty) {
        if let Some(entity) = self.entities.get_mut(index) {
            entity.respawn(rng, difficulty);
        }
    }

    /// Index of the lowest entity (closest to the floor)
    pub fn lowest(&self) -> Option<usize> {
        self.entities
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }
}

//! The player's collector bin

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::consts::*;

/// Horizontal movement direction from held input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
    Hold,
}

impl Steer {
    /// Resolve held keys: both or neither means no movement
    pub fn from_held(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => Steer::Left,
            (false, true) => Steer::Right,
            _ => Steer::Hold,
        }
    }

    fn sign(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Right => 1.0,
            Steer::Hold => 0.0,
        }
    }
}

/// The collector bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    /// Center x
    pub x: f32,
    /// Center y
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal speed (units/s)
    pub speed: f32,
    /// Category accepted right now
    pub category: Category,
}

impl Default for Collector {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: FLOOR_Y + COLLECTOR_HEIGHT / 2.0,
            width: COLLECTOR_WIDTH,
            height: COLLECTOR_HEIGHT,
            speed: COLLECTOR_SPEED,
            category: Category::default(),
        }
    }
}

impl Collector {
    /// Move horizontally, staying inside the playfield
    pub fn steer(&mut self, steer: Steer, dt: f32) {
        self.x += steer.sign() * self.speed * dt;
        self.clamp_to_playfield();
    }

    /// Move toward a target x without overshooting
    pub fn move_toward(&mut self, target_x: f32, dt: f32) {
        let max_delta = self.speed * dt;
        self.x += (target_x - self.x).clamp(-max_delta, max_delta);
        self.clamp_to_playfield();
    }

    pub fn select(&mut self, category: Category) {
        self.category = category;
    }

    fn clamp_to_playfield(&mut self) {
        let half = self.width / 2.0;
        self.x = self.x.clamp(PLAYFIELD_LEFT + half, PLAYFIELD_RIGHT - half);
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

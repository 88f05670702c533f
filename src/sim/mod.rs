//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection index)
//! - No rendering, audio or platform dependencies; the host reads snapshots
//!   and drains events

pub mod collector;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod particles;
pub mod state;
pub mod tick;

pub use collector::{Collector, Steer};
pub use collision::{Contact, contact, resolve};
pub use difficulty::Difficulty;
pub use entity::{FallingEntity, FallingEntityManager};
pub use particles::{AmbientParams, CascadeParams, FieldMode, Particle, ParticleField};
pub use state::{
    GameEvent, GameOverScreen, GamePhase, GameState, HomeScreen, MissKind, Screen, Session,
    Snapshot,
};
pub use tick::{Intent, TickInput, apply_intent, tick};

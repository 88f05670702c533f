//! Decorative particle fields
//!
//! One simulation, two configurations:
//! - Ambient: drifting debris behind the home screen. No gravity, toroidal
//!   wrap at the edges, no contacts.
//! - Cascade: the game-over trash rain. Gravity, a floor, and a cheap O(n²)
//!   pairwise push-apart. Particles that come to rest freeze for good and are
//!   skipped by integration from then on.
//!
//! The population cap keeps the pairwise pass bounded; there is no spatial
//! index.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::consts::FLOOR_Y;
use crate::tuning::Tuning;
use crate::wrap_coord;

/// A single debris particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Velocity (units/s)
    pub vel: Vec2,
    /// Orientation (radians)
    pub angle: f32,
    /// Spin (radians/s)
    pub angular_vel: f32,
    /// Diameter
    pub size: f32,
    /// Cosmetic only
    pub category: Category,
    /// Touched the floor or sat on another particle this tick
    pub resting: bool,
    /// Permanently at rest; never integrated again
    pub frozen: bool,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, category: Category) -> Self {
        Self {
            pos,
            vel,
            angle: 0.0,
            angular_vel: 0.0,
            size,
            category,
            resting: false,
            frozen: false,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    fn freeze(&mut self) {
        self.frozen = true;
        self.vel = Vec2::ZERO;
        self.angular_vel = 0.0;
    }
}

/// Ambient drift parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientParams {
    pub count: usize,
    /// Spawn region half extents
    pub spawn_half_extent: Vec2,
    /// Wrap region half extents
    pub wrap_half_extent: Vec2,
    /// Max speed per axis (units/s)
    pub max_drift: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Max spin (degrees/s)
    pub max_spin_deg: f32,
}

impl Default for AmbientParams {
    fn default() -> Self {
        Self {
            count: 50,
            spawn_half_extent: Vec2::new(2.0, 1.0),
            wrap_half_extent: Vec2::new(2.2, 1.2),
            max_drift: 0.005,
            min_size: 0.04,
            max_size: 0.08,
            max_spin_deg: 0.25,
        }
    }
}

/// Cascade (trash rain) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeParams {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    pub floor_y: f32,
    /// Horizontal damping per tick while resting
    pub friction: f32,
    /// Horizontal speed below which a resting particle freezes
    pub freeze_epsilon: f32,
    /// Horizontal kick away from an overlapping neighbour (units/s per second)
    pub contact_impulse: f32,
    pub max_particles: usize,
    /// Seconds between spawns
    pub spawn_interval: f32,
    pub spawn_half_width: f32,
    pub spawn_y: f32,
    pub spawn_band: f32,
    /// Max initial horizontal speed (units/s)
    pub max_vx: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Max spin (degrees/s)
    pub max_spin_deg: f32,
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            gravity: 3.125,
            floor_y: FLOOR_Y,
            friction: 0.85,
            freeze_epsilon: 0.001,
            contact_impulse: 0.05,
            max_particles: 300,
            spawn_interval: 0.032,
            spawn_half_width: 2.0,
            spawn_y: 1.2,
            spawn_band: 0.5,
            max_vx: 0.25,
            min_size: 0.06,
            max_size: 0.11,
            max_spin_deg: 125.0,
        }
    }
}

/// Field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldMode {
    Ambient(AmbientParams),
    Cascade(CascadeParams),
}

/// A population of particles under one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleField {
    mode: FieldMode,
    particles: Vec<Particle>,
    /// Seconds accumulated toward the next cascade spawn
    spawn_clock: f32,
}

impl ParticleField {
    /// Empty field with the given configuration
    pub fn new(mode: FieldMode) -> Self {
        Self {
            mode,
            particles: Vec::new(),
            spawn_clock: 0.0,
        }
    }

    /// Home-screen debris, fully populated
    pub fn ambient<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let params = AmbientParams {
            count: tuning.ambient_count,
            ..Default::default()
        };
        let particles = (0..params.count)
            .map(|_| spawn_ambient(&params, rng))
            .collect();
        Self {
            mode: FieldMode::Ambient(params),
            particles,
            spawn_clock: 0.0,
        }
    }

    /// Game-over rain, empty; fills over subsequent ticks
    pub fn cascade(tuning: &Tuning) -> Self {
        Self::new(FieldMode::Cascade(CascadeParams {
            max_particles: tuning.cascade_max_particles,
            spawn_interval: tuning.cascade_spawn_interval,
            ..Default::default()
        }))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Add a particle directly (bypasses the spawner)
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn frozen_count(&self) -> usize {
        self.particles.iter().filter(|p| p.frozen).count()
    }

    /// Whether the cascade has stopped spawning
    pub fn at_capacity(&self) -> bool {
        match &self.mode {
            FieldMode::Ambient(_) => true,
            FieldMode::Cascade(params) => self.particles.len() >= params.max_particles,
        }
    }

    /// Advance the field by one tick
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        match &self.mode {
            FieldMode::Ambient(params) => {
                let wrap = params.wrap_half_extent;
                tick_ambient(&mut self.particles, wrap, dt);
            }
            FieldMode::Cascade(params) => {
                let params = params.clone();
                self.spawn_cascade(&params, dt, rng);
                tick_cascade(&mut self.particles, &params, dt);
            }
        }
    }

    fn spawn_cascade<R: Rng + ?Sized>(&mut self, params: &CascadeParams, dt: f32, rng: &mut R) {
        if self.particles.len() >= params.max_particles {
            self.spawn_clock = 0.0;
            return;
        }
        self.spawn_clock += dt;
        while self.spawn_clock >= params.spawn_interval
            && self.particles.len() < params.max_particles
        {
            self.spawn_clock -= params.spawn_interval;
            self.particles.push(spawn_raindrop(params, rng));
        }
    }
}

fn spawn_ambient<R: Rng + ?Sized>(params: &AmbientParams, rng: &mut R) -> Particle {
    let half = params.spawn_half_extent;
    let pos = Vec2::new(
        rng.random_range(-half.x..=half.x),
        rng.random_range(-half.y..=half.y),
    );
    let vel = Vec2::new(
        rng.random_range(-params.max_drift..=params.max_drift),
        rng.random_range(-params.max_drift..=params.max_drift),
    );
    let size = rng.random_range(params.min_size..=params.max_size);
    let mut particle = Particle::new(pos, vel, size, rng.random());
    particle.angle = rng.random_range(0.0..std::f32::consts::TAU);
    particle.angular_vel = rng
        .random_range(-params.max_spin_deg..=params.max_spin_deg)
        .to_radians();
    particle
}

fn spawn_raindrop<R: Rng + ?Sized>(params: &CascadeParams, rng: &mut R) -> Particle {
    let pos = Vec2::new(
        rng.random_range(-params.spawn_half_width..=params.spawn_half_width),
        params.spawn_y + rng.random::<f32>() * params.spawn_band,
    );
    let vel = Vec2::new(rng.random_range(-params.max_vx..=params.max_vx), 0.0);
    let size = rng.random_range(params.min_size..=params.max_size);
    let mut particle = Particle::new(pos, vel, size, rng.random());
    particle.angle = rng.random_range(0.0..std::f32::consts::TAU);
    particle.angular_vel = rng
        .random_range(-params.max_spin_deg..=params.max_spin_deg)
        .to_radians();
    particle
}

fn tick_ambient(particles: &mut [Particle], wrap: Vec2, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.angle = crate::wrap_angle(p.angle + p.angular_vel * dt);
        p.pos.x = wrap_coord(p.pos.x, wrap.x);
        p.pos.y = wrap_coord(p.pos.y, wrap.y);
    }
}

fn tick_cascade(particles: &mut [Particle], params: &CascadeParams, dt: f32) {
    for i in 0..particles.len() {
        if particles[i].frozen {
            continue;
        }

        let mut p = particles[i];
        p.vel.y -= params.gravity * dt;
        p.pos += p.vel * dt;
        p.angle = crate::wrap_angle(p.angle + p.angular_vel * dt);

        p.resting = false;
        if p.pos.y - p.radius() <= params.floor_y {
            p.pos.y = params.floor_y + p.radius();
            p.resting = true;
        }

        // Each moving particle resolves itself against every other one, so a
        // pair of moving particles splits the overlap. Frozen ones don't yield.
        let mut kick = 0.0;
        for (j, other) in particles.iter().enumerate() {
            if i == j {
                continue;
            }
            let delta = p.pos - other.pos;
            let dist = delta.length();
            let reach = p.radius() + other.radius();
            if dist >= reach {
                continue;
            }

            let dir = if dist > f32::EPSILON {
                delta / dist
            } else {
                Vec2::Y
            };
            let share = if other.frozen { 1.0 } else { 0.5 };
            p.pos += dir * (reach - dist) * share;
            kick += if delta.x > 0.0 { 1.0 } else { -1.0 };
            if p.pos.y > other.pos.y {
                p.resting = true;
            }
        }

        // Resting particles only damp, so freezing stays reachable
        if !p.resting {
            p.vel.x += kick * params.contact_impulse * dt;
        } else {
            p.vel.x *= params.friction;
            p.vel.y = 0.0;
            if p.vel.x.abs() < params.freeze_epsilon {
                p.freeze();
            }
        }

        particles[i] = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(99)
    }

    fn empty_cascade() -> ParticleField {
        ParticleField::new(FieldMode::Cascade(CascadeParams {
            max_particles: 0,
            ..Default::default()
        }))
    }

    #[test]
    fn test_ambient_populated_and_wraps() {
        let mut rng = rng();
        let mut field = ParticleField::ambient(&Tuning::default(), &mut rng);
        assert_eq!(field.len(), 50);

        let mut field_edge = ParticleField::new(FieldMode::Ambient(AmbientParams::default()));
        field_edge.push(Particle::new(
            Vec2::new(2.19, 0.0),
            Vec2::new(1.0, 0.0),
            0.05,
            Category::Metal,
        ));
        field_edge.tick(SIM_DT, &mut rng);
        assert_eq!(field_edge.particles()[0].pos.x, -2.2);
        assert_eq!(field_edge.len(), 1);

        field.tick(SIM_DT, &mut rng);
        assert!(field.particles().iter().all(|p| p.pos.x.abs() <= 2.2 && p.pos.y.abs() <= 1.2));
    }

    #[test]
    fn test_ambient_has_no_gravity() {
        let mut rng = rng();
        let mut field = ParticleField::new(FieldMode::Ambient(AmbientParams::default()));
        field.push(Particle::new(Vec2::ZERO, Vec2::ZERO, 0.05, Category::Paper));
        for _ in 0..100 {
            field.tick(SIM_DT, &mut rng);
        }
        assert_eq!(field.particles()[0].pos, Vec2::ZERO);
        assert!(!field.particles()[0].frozen);
    }

    #[test]
    fn test_single_particle_settles_and_freezes() {
        let mut rng = rng();
        let mut field = empty_cascade();
        field.push(Particle::new(
            Vec2::new(0.0, 1.0),
            Vec2::ZERO,
            0.08,
            Category::Glass,
        ));

        let mut ticks = 0;
        while !field.particles()[0].frozen {
            field.tick(SIM_DT, &mut rng);
            ticks += 1;
            assert!(ticks < 1000, "particle never froze");
        }

        let rest = field.particles()[0];
        assert!((rest.pos.y - (FLOOR_Y + 0.04)).abs() < 1e-6);
        assert_eq!(rest.vel, Vec2::ZERO);
        assert_eq!(rest.angular_vel, 0.0);

        for _ in 0..200 {
            field.tick(SIM_DT, &mut rng);
            assert_eq!(field.particles()[0], rest);
        }
    }

    #[test]
    fn test_sliding_particle_damps_before_freezing() {
        let mut rng = rng();
        let mut field = empty_cascade();
        let size = 0.08;
        field.push(Particle::new(
            Vec2::new(0.0, FLOOR_Y + size / 2.0),
            Vec2::new(0.2, 0.0),
            size,
            Category::Paper,
        ));
        field.tick(SIM_DT, &mut rng);
        let p = field.particles()[0];
        assert!(p.resting && !p.frozen);
        assert!((p.vel.x - 0.2 * 0.85).abs() < 1e-6);

        for _ in 0..200 {
            field.tick(SIM_DT, &mut rng);
        }
        assert!(field.particles()[0].frozen);
    }

    fn weightless() -> ParticleField {
        ParticleField::new(FieldMode::Cascade(CascadeParams {
            gravity: 0.0,
            max_particles: 0,
            ..Default::default()
        }))
    }

    #[test]
    fn test_overlapping_pair_is_pushed_apart() {
        let mut rng = rng();
        let mut field = weightless();
        field.push(Particle::new(Vec2::new(-0.01, 0.5), Vec2::ZERO, 0.1, Category::Paper));
        field.push(Particle::new(Vec2::new(0.01, 0.5), Vec2::ZERO, 0.1, Category::Metal));
        field.tick(SIM_DT, &mut rng);
        let a = field.particles()[0];
        let b = field.particles()[1];
        assert!(a.pos.x < -0.01 && a.vel.x < 0.0);
        assert!(b.pos.x > 0.01 && b.vel.x > 0.0);
        assert!(a.pos.distance(b.pos) > 0.02);
        assert!(!a.frozen && !b.frozen);
    }

    #[test]
    fn test_coincident_particles_separate_vertically() {
        let mut rng = rng();
        let mut field = weightless();
        field.push(Particle::new(Vec2::new(0.0, 0.5), Vec2::ZERO, 0.1, Category::Paper));
        field.push(Particle::new(Vec2::new(0.0, 0.5), Vec2::ZERO, 0.1, Category::Paper));
        field.tick(SIM_DT, &mut rng);
        assert!(field.particles().iter().all(|p| p.pos.is_finite()));
        assert!(field.particles()[0].pos.y > field.particles()[1].pos.y);
    }

    #[test]
    fn test_particle_lands_on_frozen_one() {
        let mut rng = rng();
        let mut field = empty_cascade();
        let mut base = Particle::new(
            Vec2::new(0.0, FLOOR_Y + 0.05),
            Vec2::ZERO,
            0.1,
            Category::Organic,
        );
        base.frozen = true;
        field.push(base);
        field.push(Particle::new(Vec2::new(0.0, 0.0), Vec2::ZERO, 0.1, Category::Paper));

        for _ in 0..500 {
            field.tick(SIM_DT, &mut rng);
        }
        let top = field.particles()[1];
        assert!(top.frozen);
        assert!(top.pos.y >= base.pos.y + 0.1 - 1e-4);
        assert_eq!(field.particles()[0], base);
    }

    #[test]
    fn test_particle_wedged_against_frozen_neighbour_freezes() {
        let mut rng = rng();
        let mut field = empty_cascade();
        let mut base = Particle::new(
            Vec2::new(0.0, FLOOR_Y + 0.05),
            Vec2::ZERO,
            0.1,
            Category::Glass,
        );
        base.frozen = true;
        field.push(base);
        field.push(Particle::new(
            Vec2::new(0.09, FLOOR_Y + 0.05),
            Vec2::ZERO,
            0.1,
            Category::Metal,
        ));

        for _ in 0..50 {
            field.tick(SIM_DT, &mut rng);
        }
        let side = field.particles()[1];
        assert!(side.frozen);
        assert_eq!(side.vel, Vec2::ZERO);
        assert!(side.pos.x >= 0.1 - 1e-4);
        assert_eq!(field.particles()[0], base);
    }

    #[test]
    fn test_cascade_spawning_is_time_gated_and_capped() {
        let mut rng = rng();
        let tuning = Tuning {
            cascade_max_particles: 10,
            ..Default::default()
        };
        let mut field = ParticleField::cascade(&tuning);
        assert!(field.is_empty());

        field.tick(SIM_DT, &mut rng);
        assert_eq!(field.len(), 0);
        field.tick(SIM_DT, &mut rng);
        assert_eq!(field.len(), 1);

        for _ in 0..200 {
            field.tick(SIM_DT, &mut rng);
        }
        assert_eq!(field.len(), 10);
        assert!(field.at_capacity());
    }

    #[test]
    fn test_cascade_eventually_all_frozen() {
        let mut rng = rng();
        let tuning = Tuning {
            cascade_max_particles: 40,
            ..Default::default()
        };
        let mut field = ParticleField::cascade(&tuning);
        for _ in 0..8000 {
            field.tick(SIM_DT, &mut rng);
        }
        assert_eq!(field.len(), 40);
        assert_eq!(field.frozen_count(), 40);
    }
}

//! The particle set and its integrator.
//!
//! Particles move in a straight line at constant speed. When a coordinate
//! leaves [0, size] the matching velocity component is negated; the position
//! itself is not clamped, so a particle can sit up to one step outside the
//! surface for a single frame before it heads back in.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::config::{
    BackdropConfig, DEFAULT_RADIUS_MAX, DEFAULT_RADIUS_MIN, DEFAULT_SPEED, MAX_PARTICLE_COUNT,
};
use crate::palette::Palette;
use crate::prng::Xorshift64;
use crate::surface::Size;

/// A single animated point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub color: Rgba,
}

impl Particle {
    /// Draws a particle uniformly over `size`, with radius in
    /// `[radius_min, radius_max)` and each velocity component in `[-speed, speed)`.
    fn spawn(
        rng: &mut Xorshift64,
        size: Size,
        palette: &Palette,
        radius_min: f64,
        radius_max: f64,
        speed: f64,
    ) -> Self {
        let position = DVec2::new(
            rng.next_range(0.0, size.width.max(0.0)),
            rng.next_range(0.0, size.height.max(0.0)),
        );
        let radius = rng.next_range(radius_min, radius_max);
        let color = palette.pick(rng);
        let velocity = DVec2::new(rng.next_symmetric(speed), rng.next_symmetric(speed));
        Self {
            position,
            velocity,
            radius,
            color,
        }
    }

    /// Moves by one velocity step, then reflects each axis that ended up
    /// outside [0, bounds].
    pub fn step(&mut self, bounds: Size) {
        self.position += self.velocity;
        if self.position.x < 0.0 || self.position.x > bounds.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.height {
            self.velocity.y = -self.velocity.y;
        }
    }
}

/// Clamps a signed particle count into `0..=MAX_PARTICLE_COUNT`.
pub fn clamp_count(count: i64) -> usize {
    usize::try_from(count.max(0)).map_or(MAX_PARTICLE_COUNT, |n| n.min(MAX_PARTICLE_COUNT))
}

/// The particle set plus the bounds used for reflection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Size,
}

impl ParticleField {
    /// Creates `count` particles with the default radius [1, 5) and
    /// velocity [-0.5, 0.5) ranges.
    pub fn initialize(count: usize, size: Size, palette: &Palette, rng: &mut Xorshift64) -> Self {
        Self::spawn_many(
            count,
            size,
            palette,
            rng,
            DEFAULT_RADIUS_MIN,
            DEFAULT_RADIUS_MAX,
            DEFAULT_SPEED,
        )
    }

    /// Creates `config.particle_count` particles using the config's ranges.
    pub fn from_config(
        config: &BackdropConfig,
        size: Size,
        palette: &Palette,
        rng: &mut Xorshift64,
    ) -> Self {
        Self::spawn_many(
            config.particle_count.min(MAX_PARTICLE_COUNT),
            size,
            palette,
            rng,
            config.radius_min,
            config.radius_max,
            config.speed,
        )
    }

    fn spawn_many(
        count: usize,
        size: Size,
        palette: &Palette,
        rng: &mut Xorshift64,
        radius_min: f64,
        radius_max: f64,
        speed: f64,
    ) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(rng, size, palette, radius_min, radius_max, speed))
            .collect();
        Self {
            particles,
            bounds: size,
        }
    }

    /// Wraps explicit particles; mostly useful for scenarios and tests.
    pub fn from_particles(particles: Vec<Particle>, bounds: Size) -> Self {
        Self { particles, bounds }
    }

    /// Advances every particle by one frame against the stored bounds.
    pub fn advance(&mut self) {
        let bounds = self.bounds;
        self.particles.iter_mut().for_each(|p| p.step(bounds));
    }

    /// Replaces the reflection bounds. Particles are not moved.
    pub fn resize(&mut self, size: Size) {
        self.bounds = size;
    }

    /// Current reflection bounds.
    pub fn bounds(&self) -> Size {
        self.bounds
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
}

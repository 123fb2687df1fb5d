//! Blood bursts.
//!
//! Particles are purely visual: they never touch physics or gameplay, and
//! the renderer reads them from the snapshot.

use rand::Rng;
use stranded_shared::Vec3;

/// Hard cap on live particles; bursts past it are truncated.
pub const MAX_PARTICLES: usize = 4096;

/// Downward acceleration on particles.
pub const PARTICLE_GRAVITY: f32 = 9.8;

/// Velocity kept per tick.
pub const PARTICLE_DRAG: f32 = 0.95;

/// Lifetime of a blood particle in seconds.
pub const BLOOD_LIFESPAN: f32 = 1.0;

/// A single particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position.
    pub position: Vec3,
    /// Velocity.
    pub velocity: Vec3,
    /// Seconds left.
    pub life: f32,
}

/// Live particles.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Empty system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `count` particles at `origin` in random upward-biased
    /// directions at 1..3 units per second.
    pub fn burst<R: Rng + ?Sized>(&mut self, origin: Vec3, count: usize, rng: &mut R) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let direction = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 2.0,
                rng.gen::<f32>(),
                (rng.gen::<f32>() - 0.5) * 2.0,
            )
            .normalize();
            let speed = 1.0 + rng.gen::<f32>() * 2.0;
            self.particles.push(Particle {
                position: origin,
                velocity: direction * speed,
                life: BLOOD_LIFESPAN,
            });
        }
    }

    /// Integrates, damps and ages every particle, dropping expired ones.
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
            particle.life -= dt;
            particle.velocity = particle.velocity * PARTICLE_DRAG;
            particle.velocity.y -= PARTICLE_GRAVITY * dt;
        }
        self.particles.retain(|particle| particle.life > 0.0);
    }

    /// Live particles.
    #[inline]
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when nothing is alive.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

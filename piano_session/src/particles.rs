//! Radial particle bursts drawn at hit points.
//!
//! The render surface has no alpha compositing, so the fade is simulated
//! by shrinking each particle's radius linearly over its lifetime.

use std::f32::consts::TAU;

use rand::Rng;

/// Particles spawned per burst.
pub const BURST_COUNT: usize = 20;

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

/// One ephemeral particle: position, velocity, a fixed lifetime and its
/// birth time.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x:        f32,
    pub y:        f32,
    pub vx:       f32,
    pub vy:       f32,
    pub radius:   f32,
    pub color:    u32,
    pub lifetime: f64,
    pub birth:    f64,
}

impl Particle {
    /// Radius to draw at `now`, shrunk by the remaining-lifetime fraction,
    /// or `None` once expired.
    pub fn render_radius(&self, now: f64) -> Option<f32> {
        let elapsed = now - self.birth;
        if elapsed > self.lifetime {
            return None;
        }
        let remaining = 1.0 - (elapsed / self.lifetime) as f32;
        Some((self.radius * remaining).max(1.0))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

/// All live particles.  Bounded by spawn rate and lifetime: every particle
/// is removed once its elapsed time exceeds its lifetime.
#[derive(Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        ParticleField::default()
    }

    /// Spawn a radial burst of [`BURST_COUNT`] particles at `(x, y)`.
    ///
    /// Direction is uniform around the circle, speed 2–6 px/frame, radius
    /// 2–4 px, lifetime 0.5–1.0 s.
    pub fn burst(&mut self, x: f32, y: f32, color: u32, now: f64) {
        let mut rng = rand::thread_rng();
        for _ in 0..BURST_COUNT {
            let angle: f32 = rng.gen_range(0.0..TAU);
            let speed: f32 = rng.gen_range(2.0..6.0);
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                radius: rng.gen_range(2.0..=4.0),
                color,
                lifetime: rng.gen_range(0.5..=1.0),
                birth: now,
            });
        }
    }

    /// Advance every particle one frame and drop the expired ones.
    pub fn tick(&mut self, now: f64) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
        }
        self.particles.retain(|p| now - p.birth <= p.lifetime);
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

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

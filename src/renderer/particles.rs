//! Success celebration particles
//!
//! Purely cosmetic; owned and advanced by the renderer, one step per frame.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};

/// Particles spawned per success burst
pub const BURST_SIZE: usize = 50;
/// Frames a particle lives; life drops by 1/50 = 0.02 each frame
pub const LIFETIME_FRAMES: u32 = 50;

/// Burst origin and spread (canvas units)
const BURST_CENTER: Vec2 = Vec2::new(500.0, 200.0);
const BURST_SPREAD: Vec2 = Vec2::new(200.0, 100.0);
const BURST_SPEED: f32 = 5.0;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    pub color: [f32; 4],
    pub size: f32,
    frames_left: u32,
}

impl Particle {
    /// Remaining life in 0..=1
    pub fn life(&self) -> f32 {
        self.frames_left as f32 / LIFETIME_FRAMES as f32
    }

    pub fn is_alive(&self) -> bool {
        self.frames_left > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any live particles with a fresh burst around the string
    pub fn spawn_burst(&mut self, rng: &mut Pcg32) {
        self.particles.clear();
        for _ in 0..BURST_SIZE {
            let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
            let vel = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * BURST_SPEED;
            let color = colors::PALETTE[rng.random_range(0..colors::PALETTE.len())];
            self.particles.push(Particle {
                pos: BURST_CENTER + jitter * BURST_SPREAD,
                vel,
                color,
                size: rng.random::<f32>() * 4.0 + 2.0,
                frames_left: LIFETIME_FRAMES,
            });
        }
    }

    /// Advance one frame: move, decay, drop the expired
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.frames_left = p.frames_left.saturating_sub(1);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Geometry for all live particles, faded by remaining life
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut vertices = Vec::new();
        for p in &self.particles {
            let life = p.life();
            let halo = with_alpha(p.color, life * 0.5);
            vertices.extend(shapes::glow(p.pos, p.size + 10.0, halo, 12));
            vertices.extend(shapes::circle(p.pos, p.size, with_alpha(p.color, life), 12));
        }
        vertices
    }
}

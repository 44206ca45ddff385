//! Rendering module
//!
//! `Renderer` turns a `GameState` into a triangle list each frame; `RenderState`
//! uploads that list to the GPU and draws it.

pub mod background;
pub mod particles;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use particles::ParticleSystem;
pub use pipeline::RenderState;
pub use vertex::Vertex;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::sim::{GameEvent, GameState};
use background::Backdrop;

/// Per-frame scene builder. Owns only cosmetic state (snow, particles).
pub struct Renderer {
    backdrop: Backdrop,
    particles: ParticleSystem,
    rng: Pcg32,
}

impl Renderer {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let backdrop = Backdrop::new(&mut rng);
        Self {
            backdrop,
            particles: ParticleSystem::new(),
            rng,
        }
    }

    /// React to controller notifications
    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundSucceeded { .. } => self.particles.spawn_burst(&mut self.rng),
            GameEvent::GameStarted => self.particles.clear(),
            _ => {}
        }
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Advance cosmetics by one display frame and build its geometry
    pub fn frame(&mut self, state: &GameState, time_secs: f64) -> Vec<Vertex> {
        self.backdrop.update(&mut self.rng);
        let mut vertices = self.backdrop.vertices();

        if state.is_playing() {
            vertices.extend(scene::game_scene(state, time_secs));
            self.particles.update();
            vertices.extend(self.particles.vertices());
            vertices.extend(scene::drag_preview(state));
        } else {
            vertices.extend(scene::menu(time_secs));
        }

        vertices
    }
}

//! Night sky: gradient, fixed starfield and falling snow

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub const STAR_COUNT: usize = 100;
pub const SNOWFLAKE_COUNT: usize = 50;
/// Height a flake re-enters at after passing the bottom edge
const SNOW_RESPAWN_Y: f32 = -10.0;

/// Position and radius of star `i`; a pure function of the index
pub fn star(i: usize) -> (Vec2, f32) {
    let f = i as f32;
    let pos = Vec2::new((f * 137.5) % CANVAS_WIDTH, (f * 73.3) % CANVAS_HEIGHT);
    // Scatter sizes over 0.3..1.5 without per-frame flicker
    let size = 0.3 + ((i * 7919) % 13) as f32 / 12.0 * 1.2;
    (pos, size)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub pos: Vec2,
    /// Fall distance per frame
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Snowflake {
    fn random(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * CANVAS_WIDTH,
                rng.random::<f32>() * CANVAS_HEIGHT,
            ),
            speed: 0.3 + rng.random::<f32>() * 0.5,
            size: 1.0 + rng.random::<f32>() * 2.0,
            opacity: 0.3 + rng.random::<f32>() * 0.4,
        }
    }
}

/// Background layer with its own animated snow
#[derive(Debug, Clone)]
pub struct Backdrop {
    snowflakes: Vec<Snowflake>,
}

impl Backdrop {
    pub fn new(rng: &mut Pcg32) -> Self {
        let snowflakes = (0..SNOWFLAKE_COUNT).map(|_| Snowflake::random(rng)).collect();
        Self { snowflakes }
    }

    #[cfg(test)]
    pub fn snowflakes(&self) -> &[Snowflake] {
        &self.snowflakes
    }

    /// Advance snowfall by one frame
    pub fn update(&mut self, rng: &mut Pcg32) {
        for flake in &mut self.snowflakes {
            flake.pos.y += flake.speed;
            if flake.pos.y > CANVAS_HEIGHT {
                flake.pos.y = SNOW_RESPAWN_Y;
                flake.pos.x = rng.random::<f32>() * CANVAS_WIDTH;
            }
        }
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        let mut vertices =
            shapes::vertical_gradient(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, &colors::SKY);

        for i in 0..STAR_COUNT {
            let (pos, size) = star(i);
            vertices.extend(shapes::circle(pos, size, colors::STAR, 6));
        }

        for flake in &self.snowflakes {
            let color = with_alpha(colors::SNOW, flake.opacity);
            vertices.extend(shapes::circle(flake.pos, flake.size, color, 8));
        }

        vertices
    }
}

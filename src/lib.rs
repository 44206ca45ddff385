//! Christmas Lights Memory - a color sequence memory game
//!
//! Core modules:
//! - `sim`: Round controller (phase state machine, scheduled transitions, input)
//! - `renderer`: Frame geometry and the WebGPU pipeline that draws it
//! - `tuning`: Data-driven timings and scoring

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 120;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock frame fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical canvas size; all geometry is laid out in these units
    pub const CANVAS_WIDTH: f32 = 1000.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Bulbs per round are capped here regardless of level
    pub const MAX_BULBS: usize = 8;
    /// Palette size at level 1, and the cap reached at level 4
    pub const BASE_PALETTE: usize = 4;
    pub const MAX_PALETTE: usize = 6;

    /// Horizontal bounds the light string spans
    pub const STRING_START_X: f32 = 150.0;
    pub const STRING_END_X: f32 = 850.0;
    /// Resting height of the wire and of the bulb centers
    pub const WIRE_Y: f32 = 185.0;
    pub const BULB_Y: f32 = 220.0;
    /// Bulb body radius
    pub const BULB_RADIUS: f32 = 18.0;
}

/// Number of bulbs on the string at a given level
#[inline]
pub fn bulb_count(level: u32) -> usize {
    (level as usize).min(consts::MAX_BULBS)
}

/// Number of selectable colors at a given level
#[inline]
pub fn palette_size(level: u32) -> usize {
    (consts::BASE_PALETTE + level as usize / 2).min(consts::MAX_PALETTE)
}

/// Horizontal spacing between sockets for `count` bulbs
#[inline]
pub fn bulb_spacing(count: usize) -> f32 {
    (consts::STRING_END_X - consts::STRING_START_X) / (count + 1) as f32
}

/// Center of bulb `index` when `count` bulbs hang on the string
#[inline]
pub fn bulb_position(index: usize, count: usize) -> Vec2 {
    let x = consts::STRING_START_X + (index + 1) as f32 * bulb_spacing(count);
    Vec2::new(x, consts::BULB_Y)
}

/// Height of the wire at string point `i` (0 and `count + 1` are the anchors)
#[inline]
pub fn wire_height(i: usize) -> f32 {
    consts::WIRE_Y + (i as f32 * 0.5).sin() * 2.0
}

/// Map a pointer position in CSS pixels to logical canvas coordinates
#[inline]
pub fn screen_to_canvas(x: f32, y: f32, client_width: f32, client_height: f32) -> Vec2 {
    if client_width <= 0.0 || client_height <= 0.0 {
        return Vec2::new(x, y);
    }
    Vec2::new(
        x * consts::CANVAS_WIDTH / client_width,
        y * consts::CANVAS_HEIGHT / client_height,
    )
}

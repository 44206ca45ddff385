//! Data-driven game balance
//!
//! Every timing and scoring constant of a round lives here. Defaults match the
//! shipped game; a page can override any subset with a JSON block.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;

/// Round timings (milliseconds) and scoring rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Pause in Ready before the next sequence is generated
    pub ready_delay_ms: u32,
    /// How long each bulb of the sequence is lit
    pub flash_step_ms: u32,
    /// Pause after the last bulb before the lights clear
    pub flash_tail_ms: u32,
    /// All-off interval between flashing and input
    pub clear_delay_ms: u32,
    /// Suspense between the last placement and the verdict
    pub checking_delay_ms: u32,
    /// How long the success celebration holds before the next level
    pub success_hold_ms: u32,
    /// How long wrong bulbs stay dimmed before a retry
    pub fail_hold_ms: u32,
    /// Repeat action cooldown, in whole seconds
    pub repeat_cooldown_secs: u32,
    /// Points per level for a solved round
    pub points_per_level: u64,
    /// Multiplier applied while double mode is on
    pub double_multiplier: u64,
    /// Click distance (canvas units) that still counts as hitting a bulb
    pub hit_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ready_delay_ms: 100,
            flash_step_ms: 600,
            flash_tail_ms: 500,
            clear_delay_ms: 400,
            checking_delay_ms: 300,
            success_hold_ms: 2000,
            fail_hold_ms: 1500,
            repeat_cooldown_secs: 10,
            points_per_level: 10,
            double_multiplier: 2,
            hit_radius: 25.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Points awarded for solving a round at `level`
    pub fn round_points(&self, level: u32, double_mode: bool) -> u64 {
        let base = level as u64 * self.points_per_level;
        if double_mode {
            base * self.double_multiplier
        } else {
            base
        }
    }

    /// Ticks in one whole second of cooldown
    pub fn cooldown_step_ticks(&self) -> u64 {
        TICK_RATE as u64
    }

    pub fn flash_step_ticks(&self) -> u64 {
        ms_to_ticks(self.flash_step_ms)
    }
}

/// Convert milliseconds to simulation ticks, rounding up
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (ms as u64 * TICK_RATE as u64).div_ceil(1000)
}

/// Load the page-provided override (`<script id="tuning" type="application/json">`)
#[cfg(target_arch = "wasm32")]
pub fn load_from_page() -> Tuning {
    let json = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("tuning"))
        .and_then(|el| el.text_content());

    match json {
        Some(json) if !json.trim().is_empty() => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning JSON: {}", e);
                Tuning::default()
            }
        },
        _ => Tuning::default(),
    }
}

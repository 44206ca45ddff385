//! Round controller
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod input;
pub mod state;
pub mod tick;
pub mod timer;

pub use input::{InputEvent, apply_input};
pub use state::{FlashCursor, GameEvent, GameState, Phase, Round, Screen};
pub use tick::{advance, start_game, tick};
pub use timer::{Scheduler, TimerSlot, TimerToken, Transition};

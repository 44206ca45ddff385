//! Game state and round data
//!
//! One owned `GameState` holds everything the controller mutates; the renderer
//! only ever borrows it immutably.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::timer::Scheduler;
use crate::tuning::Tuning;
use crate::{bulb_count, palette_size};

/// Whether a game is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Title screen, waiting for the first click
    Menu,
    /// A game is in progress
    Playing,
}

/// Stage within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Short pause before a new sequence is generated
    Ready,
    /// Sequence is being shown one bulb at a time
    Flashing,
    /// All lights off before input opens
    Clear,
    /// Player assigns colors to bulbs
    Input,
    /// Every slot filled, verdict pending
    Checking,
    /// Sequence reproduced
    Success,
    /// Sequence mismatched
    Fail,
}

/// Notifications published by the controller for presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    RoundStarted { level: u32 },
    RoundSucceeded { level: u32, points: u64 },
    RoundFailed { level: u32 },
    LevelUp { level: u32 },
}

/// One round: the sequence to remember and the player's attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    level: u32,
    target: Vec<usize>,
    player: Vec<Option<usize>>,
}

impl Round {
    /// Build a round around an explicit target sequence
    ///
    /// Returns `None` if the sequence does not fit the level (wrong length or a
    /// color outside the palette).
    pub fn with_target(level: u32, target: Vec<usize>) -> Option<Self> {
        let palette = palette_size(level);
        if target.len() != bulb_count(level) || target.iter().any(|&c| c >= palette) {
            return None;
        }
        let player = vec![None; target.len()];
        Some(Self {
            level,
            target,
            player,
        })
    }

    /// Generate a uniformly random round for `level`
    pub fn generate(level: u32, rng: &mut Pcg32) -> Self {
        let palette = palette_size(level);
        let target = (0..bulb_count(level))
            .map(|_| rng.random_range(0..palette))
            .collect::<Vec<_>>();
        let player = vec![None; target.len()];
        Self {
            level,
            target,
            player,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn target(&self) -> &[usize] {
        &self.target
    }

    pub fn player(&self) -> &[Option<usize>] {
        &self.player
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Whether `slot` exists and has no color yet
    pub fn is_slot_empty(&self, slot: usize) -> bool {
        matches!(self.player.get(slot), Some(None))
    }

    /// Put `color` in an empty slot; returns false if the slot is taken or out of range
    pub fn place(&mut self, slot: usize, color: usize) -> bool {
        match self.player.get_mut(slot) {
            Some(entry) if entry.is_none() => {
                *entry = Some(color);
                true
            }
            _ => false,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.player.iter().all(Option::is_some)
    }

    /// Exact elementwise match; a partially filled attempt never matches
    pub fn is_solved(&self) -> bool {
        self.player
            .iter()
            .zip(&self.target)
            .all(|(p, t)| *p == Some(*t))
    }

    /// Whether the player's color at `slot` differs from the target
    pub fn is_wrong(&self, slot: usize) -> bool {
        match (self.player.get(slot), self.target.get(slot)) {
            (Some(p), Some(t)) => *p != Some(*t),
            _ => false,
        }
    }

    pub fn clear_player(&mut self) {
        self.player.iter_mut().for_each(|p| *p = None);
    }
}

/// Position of the flash cursor while the sequence is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashCursor {
    /// Bulb being lit; equals the round length during the tail pause
    pub index: usize,
    /// Tick at which this bulb started lighting
    pub started_tick: u64,
}

/// Complete controller state
#[derive(Debug, Clone)]
pub struct GameState {
    pub screen: Screen,
    pub phase: Phase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Current round; `None` until the first sequence is generated
    pub round: Option<Round>,
    /// Flash cursor, only while flashing
    pub flash: Option<FlashCursor>,
    /// Double scoring for the pending round
    pub double_mode: bool,
    /// Seconds until repeat is available again
    pub repeat_cooldown: u32,
    /// Color chosen from the palette, waiting to be placed
    pub pending_color: Option<usize>,
    /// Pointer position for the drag preview (canvas coordinates)
    pub drag_position: Option<Vec2>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub tuning: Tuning,
    pub(crate) timers: Scheduler,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the title screen with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            screen: Screen::Menu,
            phase: Phase::Ready,
            level: 1,
            score: 0,
            round: None,
            flash: None,
            double_mode: false,
            repeat_cooldown: 0,
            pending_color: None,
            drag_position: None,
            time_ticks: 0,
            tuning,
            timers: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn bulb_count(&self) -> usize {
        bulb_count(self.level)
    }

    pub fn palette_size(&self) -> usize {
        palette_size(self.level)
    }

    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing
    }

    /// Progress (0..=1) of the bulb currently flashing
    pub fn flash_progress(&self) -> f32 {
        match self.flash {
            Some(cursor) => {
                let step = self.tuning.flash_step_ticks().max(1);
                let elapsed = self.time_ticks.saturating_sub(cursor.started_tick);
                (elapsed as f32 / step as f32).min(1.0)
            }
            None => 0.0,
        }
    }

    /// Whether the repeat action would currently be accepted
    pub fn can_repeat(&self) -> bool {
        self.is_playing() && self.phase == Phase::Input && self.repeat_cooldown == 0
    }

    /// Whether the double toggle is offered
    pub fn can_toggle_double(&self) -> bool {
        self.is_playing() && self.level > 1
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events published since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

//! Player input handling
//!
//! Each event is applied synchronously against the current state and causes
//! at most one state change. Anything not applicable in the current phase is
//! ignored; `apply_input` reports whether the event was accepted.

use glam::Vec2;

use super::state::{GameState, Phase, Screen};
use super::tick::{enter_checking, restart_flashing, schedule_cooldown_step, start_game};
use crate::bulb_position;

/// Input commands (pointer positions are in canvas coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Click/tap on the canvas
    Click(Vec2),
    /// Pointer moved over the canvas
    PointerMove(Vec2),
    /// Pointer left the canvas
    PointerLeave,
    /// Palette swatch chosen; choosing the pending color again deselects it
    SelectColor(usize),
    /// Double-scoring checkbox changed
    SetDoubleMode(bool),
    /// Show the sequence again
    Repeat,
}

/// Apply one input event. Returns `false` when the event was ignored.
pub fn apply_input(state: &mut GameState, event: InputEvent) -> bool {
    let accepted = match event {
        InputEvent::Click(pos) => click(state, pos),
        InputEvent::PointerMove(pos) => pointer_move(state, pos),
        InputEvent::PointerLeave => state.drag_position.take().is_some(),
        InputEvent::SelectColor(color) => select_color(state, color),
        InputEvent::SetDoubleMode(on) => set_double_mode(state, on),
        InputEvent::Repeat => repeat(state),
    };
    if !accepted && !matches!(event, InputEvent::PointerMove(_) | InputEvent::PointerLeave) {
        log::debug!("Ignored {:?} during {:?}", event, state.phase);
    }
    accepted
}

fn click(state: &mut GameState, pos: Vec2) -> bool {
    if state.screen == Screen::Menu {
        start_game(state);
        return true;
    }

    if state.phase != Phase::Input {
        return false;
    }
    let Some(color) = state.pending_color else {
        return false;
    };
    let Some(round) = state.round.as_mut() else {
        return false;
    };

    let count = round.len();
    let radius = state.tuning.hit_radius;
    let slot = (0..count).find(|&i| {
        round.is_slot_empty(i) && bulb_position(i, count).distance(pos) < radius
    });
    let Some(slot) = slot else {
        return false;
    };

    round.place(slot, color);
    let filled = round.is_filled();
    state.pending_color = None;
    state.drag_position = None;

    if filled {
        enter_checking(state);
    }
    true
}

fn pointer_move(state: &mut GameState, pos: Vec2) -> bool {
    if state.pending_color.is_none() {
        return false;
    }
    state.drag_position = Some(pos);
    true
}

fn select_color(state: &mut GameState, color: usize) -> bool {
    if !state.is_playing() || state.phase != Phase::Input || color >= state.palette_size() {
        return false;
    }
    state.pending_color = if state.pending_color == Some(color) {
        None
    } else {
        Some(color)
    };
    true
}

fn set_double_mode(state: &mut GameState, on: bool) -> bool {
    if !state.can_toggle_double() {
        return false;
    }
    state.double_mode = on;
    true
}

fn repeat(state: &mut GameState) -> bool {
    if !state.can_repeat() {
        return false;
    }
    let Some(round) = state.round.as_mut() else {
        return false;
    };
    round.clear_player();
    state.repeat_cooldown = state.tuning.repeat_cooldown_secs;
    if state.repeat_cooldown > 0 {
        schedule_cooldown_step(state);
    }
    restart_flashing(state);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Round;

    /// A playing state sitting in Input with an explicit target
    fn input_state(level: u32, target: Vec<usize>) -> GameState {
        let mut state = GameState::new(1);
        state.screen = Screen::Playing;
        state.level = level;
        state.phase = Phase::Input;
        state.round = Round::with_target(level, target);
        assert!(state.round.is_some());
        state
    }

    #[test]
    fn test_click_on_menu_starts_game() {
        let mut state = GameState::new(1);
        state.score = 70;
        state.level = 5;
        assert!(apply_input(&mut state, InputEvent::Click(Vec2::new(3.0, 900.0))));
        assert_eq!(state.screen, Screen::Playing);
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_click_without_pending_color_is_ignored() {
        let mut state = input_state(2, vec![0, 1]);
        assert!(!apply_input(&mut state, InputEvent::Click(bulb_position(0, 2))));
        assert_eq!(state.round.as_ref().unwrap().player(), &[None, None]);
    }

    #[test]
    fn test_click_places_pending_color() {
        let mut state = input_state(2, vec![0, 1]);
        apply_input(&mut state, InputEvent::SelectColor(3));
        apply_input(&mut state, InputEvent::PointerMove(Vec2::new(10.0, 10.0)));
        assert!(state.drag_position.is_some());

        let near = bulb_position(1, 2) + Vec2::new(10.0, -15.0);
        assert!(apply_input(&mut state, InputEvent::Click(near)));
        assert_eq!(state.round.as_ref().unwrap().player(), &[None, Some(3)]);
        assert_eq!(state.pending_color, None);
        assert_eq!(state.drag_position, None);
        assert_eq!(state.phase, Phase::Input);
    }

    #[test]
    fn test_click_outside_radius_is_ignored() {
        let mut state = input_state(2, vec![0, 1]);
        apply_input(&mut state, InputEvent::SelectColor(2));
        let far = bulb_position(0, 2) + Vec2::new(25.0, 0.0);
        assert!(!apply_input(&mut state, InputEvent::Click(far)));
        assert_eq!(state.pending_color, Some(2));
    }

    #[test]
    fn test_click_on_filled_slot_is_ignored() {
        let mut state = input_state(2, vec![0, 1]);
        apply_input(&mut state, InputEvent::SelectColor(2));
        apply_input(&mut state, InputEvent::Click(bulb_position(0, 2)));
        apply_input(&mut state, InputEvent::SelectColor(1));
        assert!(!apply_input(&mut state, InputEvent::Click(bulb_position(0, 2))));
        assert_eq!(state.round.as_ref().unwrap().player(), &[Some(2), None]);
        assert_eq!(state.pending_color, Some(1));
    }

    #[test]
    fn test_last_placement_enters_checking() {
        let mut state = input_state(1, vec![2]);
        apply_input(&mut state, InputEvent::SelectColor(1));
        apply_input(&mut state, InputEvent::Click(bulb_position(0, 1)));
        assert_eq!(state.phase, Phase::Checking);

        // Input is closed while checking
        assert!(!apply_input(&mut state, InputEvent::SelectColor(0)));
        assert!(!apply_input(&mut state, InputEvent::Repeat));
    }

    #[test]
    fn test_select_color_toggles_and_respects_palette() {
        let mut state = input_state(1, vec![0]);
        assert!(apply_input(&mut state, InputEvent::SelectColor(1)));
        assert_eq!(state.pending_color, Some(1));
        assert!(apply_input(&mut state, InputEvent::SelectColor(1)));
        assert_eq!(state.pending_color, None);
        // Level 1 only offers four colors
        assert!(!apply_input(&mut state, InputEvent::SelectColor(4)));
        assert_eq!(state.pending_color, None);
    }

    #[test]
    fn test_select_color_only_during_input() {
        let mut state = input_state(1, vec![0]);
        state.phase = Phase::Flashing;
        assert!(!apply_input(&mut state, InputEvent::SelectColor(0)));
    }

    #[test]
    fn test_pointer_move_without_selection_does_nothing() {
        let mut state = input_state(1, vec![0]);
        assert!(!apply_input(&mut state, InputEvent::PointerMove(Vec2::new(1.0, 1.0))));
        assert_eq!(state.drag_position, None);
        assert!(!apply_input(&mut state, InputEvent::PointerLeave));
    }

    #[test]
    fn test_double_mode_requires_level_two() {
        let mut state = input_state(1, vec![0]);
        assert!(!apply_input(&mut state, InputEvent::SetDoubleMode(true)));
        assert!(!state.double_mode);

        let mut state = input_state(2, vec![0, 0]);
        assert!(apply_input(&mut state, InputEvent::SetDoubleMode(true)));
        assert!(state.double_mode);
        assert!(apply_input(&mut state, InputEvent::SetDoubleMode(false)));
        assert!(!state.double_mode);
    }

    #[test]
    fn test_repeat_outside_input_is_ignored() {
        let mut state = input_state(1, vec![0]);
        state.phase = Phase::Clear;
        assert!(!apply_input(&mut state, InputEvent::Repeat));
        assert_eq!(state.repeat_cooldown, 0);
    }

    #[test]
    fn test_menu_ignores_gameplay_input() {
        let mut state = GameState::new(1);
        assert!(!apply_input(&mut state, InputEvent::Repeat));
        assert!(!apply_input(&mut state, InputEvent::SelectColor(0)));
        assert!(!apply_input(&mut state, InputEvent::SetDoubleMode(true)));
        assert_eq!(state.screen, Screen::Menu);
    }
}

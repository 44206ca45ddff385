//! Fixed timestep simulation tick
//!
//! Advances the round clock and applies whichever scheduled transitions have
//! come due. Input-driven transitions live in `input.rs`.

use super::state::{FlashCursor, GameEvent, GameState, Phase, Round, Screen};
use super::timer::{TimerSlot, Transition};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::tuning::ms_to_ticks;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState) {
    if state.screen != Screen::Playing {
        return;
    }

    state.time_ticks += 1;

    while let Some((_, transition)) = state.timers.pop_due(state.time_ticks) {
        apply_transition(state, transition);
    }
}

/// Run as many fixed ticks as `dt` seconds of wall time cover.
///
/// At most `MAX_SUBSTEPS` ticks run per call; any backlog beyond that is
/// dropped so a slow display never leaves the clock permanently behind.
/// Returns the number of ticks run.
pub fn advance(state: &mut GameState, accumulator: &mut f32, dt: f32) -> u32 {
    *accumulator += dt.clamp(0.0, MAX_FRAME_DT);

    let mut substeps = 0;
    while *accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
        tick(state);
        *accumulator -= SIM_DT;
        substeps += 1;
    }
    if substeps == MAX_SUBSTEPS {
        *accumulator = 0.0;
    }
    substeps
}

/// Leave the menu and start a fresh game at level 1
pub fn start_game(state: &mut GameState) {
    state.timers.cancel(TimerSlot::Phase);
    state.screen = Screen::Playing;
    state.level = 1;
    state.score = 0;
    state.round = None;
    state.flash = None;
    state.pending_color = None;
    state.drag_position = None;
    state.emit(GameEvent::GameStarted);
    log::info!("Game started");
    enter_ready(state);
}

/// Show the current round's sequence again from the first bulb
pub(crate) fn restart_flashing(state: &mut GameState) {
    state.phase = Phase::Flashing;
    state.flash = Some(FlashCursor {
        index: 0,
        started_tick: state.time_ticks,
    });
    let step = state.tuning.flash_step_ticks();
    schedule_phase(state, Transition::AdvanceFlash, step);
}

/// All slots filled: lock input and wait for the verdict
pub(crate) fn enter_checking(state: &mut GameState) {
    state.phase = Phase::Checking;
    log::debug!("Checking sequence");
    let delay = ms_to_ticks(state.tuning.checking_delay_ms);
    schedule_phase(state, Transition::Resolve, delay);
}

/// Arm the once-per-second cooldown countdown
pub(crate) fn schedule_cooldown_step(state: &mut GameState) {
    let due = state.time_ticks + state.tuning.cooldown_step_ticks();
    state
        .timers
        .schedule(TimerSlot::Cooldown, Transition::CooldownStep, due);
}

fn schedule_phase(state: &mut GameState, transition: Transition, delay_ticks: u64) {
    let due = state.time_ticks + delay_ticks;
    state.timers.schedule(TimerSlot::Phase, transition, due);
}

fn enter_ready(state: &mut GameState) {
    state.phase = Phase::Ready;
    let delay = ms_to_ticks(state.tuning.ready_delay_ms);
    schedule_phase(state, Transition::BeginRound, delay);
}

fn apply_transition(state: &mut GameState, transition: Transition) {
    log::debug!("{:?} at tick {} ({:?})", transition, state.time_ticks, state.phase);

    match transition {
        Transition::BeginRound => {
            let round = Round::generate(state.level, &mut state.rng);
            state.round = Some(round);
            state.emit(GameEvent::RoundStarted { level: state.level });
            restart_flashing(state);
        }
        Transition::AdvanceFlash => {
            let len = state.round.as_ref().map_or(0, Round::len);
            let next = state.flash.map_or(len, |c| c.index + 1);
            state.flash = Some(FlashCursor {
                index: next,
                started_tick: state.time_ticks,
            });
            if next < len {
                let step = state.tuning.flash_step_ticks();
                schedule_phase(state, Transition::AdvanceFlash, step);
            } else {
                let tail = ms_to_ticks(state.tuning.flash_tail_ms);
                schedule_phase(state, Transition::EnterClear, tail);
            }
        }
        Transition::EnterClear => {
            state.phase = Phase::Clear;
            state.flash = None;
            let delay = ms_to_ticks(state.tuning.clear_delay_ms);
            schedule_phase(state, Transition::EnterInput, delay);
        }
        Transition::EnterInput => {
            state.phase = Phase::Input;
        }
        Transition::Resolve => {
            let solved = state.round.as_ref().is_some_and(Round::is_solved);
            // Scored at the level the sequence was generated for
            let level = state.round.as_ref().map_or(state.level, Round::level);
            if solved {
                let points = state.tuning.round_points(level, state.double_mode);
                state.score += points;
                state.phase = Phase::Success;
                state.emit(GameEvent::RoundSucceeded { level, points });
                log::info!("Level {} solved (+{} points, score {})", level, points, state.score);
                let hold = ms_to_ticks(state.tuning.success_hold_ms);
                schedule_phase(state, Transition::FinishSuccess, hold);
            } else {
                state.phase = Phase::Fail;
                state.emit(GameEvent::RoundFailed { level });
                log::info!("Level {} failed, retrying", level);
                let hold = ms_to_ticks(state.tuning.fail_hold_ms);
                schedule_phase(state, Transition::FinishFail, hold);
            }
        }
        Transition::FinishSuccess => {
            state.level += 1;
            state.double_mode = false;
            state.emit(GameEvent::LevelUp { level: state.level });
            enter_ready(state);
        }
        Transition::FinishFail => {
            if let Some(round) = state.round.as_mut() {
                round.clear_player();
            }
            state.phase = Phase::Input;
        }
        Transition::CooldownStep => {
            state.repeat_cooldown = state.repeat_cooldown.saturating_sub(1);
            if state.repeat_cooldown > 0 {
                schedule_cooldown_step(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::{InputEvent, apply_input};
    use crate::{bulb_position, palette_size};

    /// Run the simulation for `ms` milliseconds of game time
    fn run_ms(state: &mut GameState, ms: u32) {
        for _ in 0..ms_to_ticks(ms) {
            tick(state);
        }
    }

    fn run_ticks(state: &mut GameState, ticks: u64) {
        for _ in 0..ticks {
            tick(state);
        }
    }

    /// Run until `phase` is reached (bounded)
    fn run_until(state: &mut GameState, phase: Phase) {
        for _ in 0..10_000 {
            if state.phase == phase {
                return;
            }
            tick(state);
        }
        panic!("never reached {:?}, stuck in {:?}", phase, state.phase);
    }

    /// Place `colors` in order, one palette selection and one click per bulb
    fn place_all(state: &mut GameState, colors: &[usize]) {
        let count = state.bulb_count();
        for (slot, &color) in colors.iter().enumerate() {
            assert!(apply_input(state, InputEvent::SelectColor(color)));
            assert!(apply_input(state, InputEvent::Click(bulb_position(slot, count))));
        }
    }

    fn solve_current_round(state: &mut GameState) {
        run_until(state, Phase::Input);
        let target = state.round.as_ref().unwrap().target().to_vec();
        place_all(state, &target);
    }

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        start_game(&mut state);
        state
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(1);
        run_ms(&mut state, 5000);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.screen, Screen::Menu);
    }

    #[test]
    fn test_level_one_full_cycle() {
        let mut state = started(42);
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.round.is_none());

        // Ready holds for 100ms
        run_ms(&mut state, 90);
        assert_eq!(state.phase, Phase::Ready);
        run_ms(&mut state, 10);
        assert_eq!(state.phase, Phase::Flashing);

        let round = state.round.clone().unwrap();
        assert_eq!(round.len(), 1);
        assert!(round.target()[0] < 4);
        assert_eq!(round.player(), &[None]);
        assert_eq!(state.flash.unwrap().index, 0);

        // One bulb for 600ms, then the 500ms tail, still flashing
        run_ms(&mut state, 600);
        assert_eq!(state.phase, Phase::Flashing);
        assert_eq!(state.flash.unwrap().index, 1);
        run_ms(&mut state, 500);
        assert_eq!(state.phase, Phase::Clear);
        assert!(state.flash.is_none());
        run_ms(&mut state, 400);
        assert_eq!(state.phase, Phase::Input);

        place_all(&mut state, round.target());
        assert_eq!(state.phase, Phase::Checking);
        run_ms(&mut state, 300);
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.score, 10);
        assert_eq!(state.level, 1);

        run_ms(&mut state, 2000);
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 10);

        let events = state.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::GameStarted));
        assert!(events.contains(&GameEvent::RoundSucceeded { level: 1, points: 10 }));
        assert_eq!(events.last(), Some(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_advance_runs_whole_ticks_and_keeps_remainder() {
        let mut state = started(4);
        let mut accumulator = 0.0;
        assert_eq!(advance(&mut state, &mut accumulator, SIM_DT * 2.5), 2);
        assert_eq!(state.time_ticks, 2);
        assert!(accumulator > 0.0 && accumulator < SIM_DT);
    }

    #[test]
    fn test_advance_drops_backlog_past_substep_cap() {
        let mut state = started(4);
        let mut accumulator = 0.0;
        for _ in 0..20 {
            // 100ms frames: more than the substep cap can cover
            assert_eq!(advance(&mut state, &mut accumulator, 0.1), MAX_SUBSTEPS);
            assert_eq!(accumulator, 0.0);
        }
        assert_eq!(state.time_ticks, 20 * MAX_SUBSTEPS as u64);

        // Back at full frame rate nothing is left to catch up on
        assert_eq!(advance(&mut state, &mut accumulator, 1.0 / 60.0), 2);
    }

    #[test]
    fn test_round_carries_its_level_into_scoring() {
        let mut state = started(17);
        state.level = 2;
        solve_current_round(&mut state);
        run_until(&mut state, Phase::Success);

        assert_eq!(state.round.as_ref().unwrap().level(), 2);
        assert!(state
            .drain_events()
            .contains(&GameEvent::RoundSucceeded { level: 2, points: 20 }));
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_flash_steps_through_every_bulb() {
        let mut state = started(3);
        state.level = 4;
        run_until(&mut state, Phase::Flashing);
        let len = state.round.as_ref().unwrap().len();
        assert_eq!(len, 4);

        for expected in 0..len {
            assert_eq!(state.flash.unwrap().index, expected);
            assert_eq!(state.flash_progress(), 0.0);
            run_ms(&mut state, 300);
            assert!((state.flash_progress() - 0.5).abs() < 0.01);
            run_ms(&mut state, 300);
        }
        assert_eq!(state.flash.unwrap().index, len);
        assert_eq!(state.phase, Phase::Flashing);
    }

    #[test]
    fn test_consecutive_successes_score() {
        let mut state = started(2024);
        for n in 1..=6u64 {
            solve_current_round(&mut state);
            run_until(&mut state, Phase::Success);
            assert_eq!(state.score, (1..=n).map(|i| i * 10).sum::<u64>());
            run_until(&mut state, Phase::Ready);
            assert_eq!(state.level as u64, n + 1);
        }
    }

    #[test]
    fn test_double_mode_at_level_three() {
        let mut state = started(11);
        solve_current_round(&mut state);
        run_until(&mut state, Phase::Ready);
        solve_current_round(&mut state);
        run_until(&mut state, Phase::Ready);
        assert_eq!(state.level, 3);
        assert_eq!(state.score, 30);

        run_until(&mut state, Phase::Input);
        assert!(apply_input(&mut state, InputEvent::SetDoubleMode(true)));
        let target = state.round.as_ref().unwrap().target().to_vec();
        place_all(&mut state, &target);
        run_until(&mut state, Phase::Success);
        assert_eq!(state.score, 90);

        // Double mode is switched off for the next level
        run_until(&mut state, Phase::Ready);
        assert!(!state.double_mode);
    }

    #[test]
    fn test_double_mode_toggled_mid_check_still_counts() {
        let mut state = started(11);
        solve_current_round(&mut state);
        run_until(&mut state, Phase::Ready);
        solve_current_round(&mut state);
        assert_eq!(state.phase, Phase::Checking);
        // Only consulted at the moment of success
        assert!(apply_input(&mut state, InputEvent::SetDoubleMode(true)));
        run_until(&mut state, Phase::Success);
        assert_eq!(state.score, 10 + 40);
    }

    #[test]
    fn test_wrong_placement_fails_and_retries() {
        let mut state = started(5);
        state.level = 2;
        run_until(&mut state, Phase::Input);
        let target = state.round.as_ref().unwrap().target().to_vec();
        let mut wrong = target.clone();
        wrong[1] = (wrong[1] + 1) % palette_size(2);
        place_all(&mut state, &wrong);

        run_ms(&mut state, 300);
        assert_eq!(state.phase, Phase::Fail);
        assert_eq!(state.score, 0);
        assert!(state.round.as_ref().unwrap().is_wrong(1));
        assert!(!state.round.as_ref().unwrap().is_wrong(0));

        run_ms(&mut state, 1500);
        assert_eq!(state.phase, Phase::Input);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.round.as_ref().unwrap().player(), &[None, None]);
        // Same sequence is kept for the retry
        assert_eq!(state.round.as_ref().unwrap().target(), &target[..]);

        place_all(&mut state, &target);
        run_until(&mut state, Phase::Success);
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_repeat_reflashes_same_sequence() {
        let mut state = started(8);
        state.level = 3;
        run_until(&mut state, Phase::Input);
        let target = state.round.as_ref().unwrap().target().to_vec();

        apply_input(&mut state, InputEvent::SelectColor(target[0]));
        apply_input(&mut state, InputEvent::Click(bulb_position(0, 3)));
        assert!(apply_input(&mut state, InputEvent::Repeat));

        assert_eq!(state.phase, Phase::Flashing);
        assert_eq!(state.flash.unwrap().index, 0);
        assert_eq!(state.repeat_cooldown, 10);
        assert_eq!(state.round.as_ref().unwrap().player(), &[None, None, None]);
        assert_eq!(state.round.as_ref().unwrap().target(), &target[..]);

        run_until(&mut state, Phase::Input);
        assert_eq!(state.round.as_ref().unwrap().target(), &target[..]);
    }

    #[test]
    fn test_repeat_cooldown_counts_down_ten_seconds() {
        let mut state = started(9);
        run_until(&mut state, Phase::Input);
        assert!(apply_input(&mut state, InputEvent::Repeat));

        for remaining in (1..=10).rev() {
            assert_eq!(state.repeat_cooldown, remaining);
            run_ticks(&mut state, 119);
            assert_eq!(state.repeat_cooldown, remaining);
            run_ticks(&mut state, 1);
        }
        assert_eq!(state.repeat_cooldown, 0);
    }

    #[test]
    fn test_repeat_blocked_during_cooldown() {
        let mut state = started(9);
        run_until(&mut state, Phase::Input);
        assert!(apply_input(&mut state, InputEvent::Repeat));
        run_until(&mut state, Phase::Input);
        assert!(state.repeat_cooldown > 0);
        assert!(!apply_input(&mut state, InputEvent::Repeat));
        assert_eq!(state.phase, Phase::Input);

        run_ms(&mut state, 10_000);
        assert_eq!(state.repeat_cooldown, 0);
        assert!(apply_input(&mut state, InputEvent::Repeat));
    }

    #[test]
    fn test_restart_cancels_stale_phase_timer() {
        let mut state = started(1);
        run_until(&mut state, Phase::Input);
        let target = state.round.as_ref().unwrap().target().to_vec();
        place_all(&mut state, &target);
        assert_eq!(state.phase, Phase::Checking);

        // A new game supersedes the pending verdict
        start_game(&mut state);
        run_ms(&mut state, 300);
        assert_ne!(state.phase, Phase::Success);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = started(99999);
        let mut b = started(99999);
        for _ in 0..5 {
            solve_current_round(&mut a);
            solve_current_round(&mut b);
            run_until(&mut a, Phase::Ready);
            run_until(&mut b, Phase::Ready);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.round, b.round);
        assert_eq!(a.score, b.score);
    }
}

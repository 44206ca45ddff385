//! Scene composition: menu card, railing, light string and bulbs
//!
//! Everything here reads `GameState` and returns geometry; nothing mutates it.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::{BULB_RADIUS, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{GameState, Phase};
use crate::{bulb_position, wire_height};

/// Below this intensity a bulb reads as unlit
pub const GLOW_THRESHOLD: f32 = 0.1;
/// Intensity of a bulb holding the player's color
pub const PLACED_INTENSITY: f32 = 0.7;
/// Intensity of a wrongly placed bulb after a failed check
pub const WRONG_INTENSITY: f32 = 0.2;

const SEGMENTS: u32 = 32;

/// How a single bulb should look this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulbVisual {
    pub color: [f32; 4],
    pub intensity: f32,
}

impl BulbVisual {
    const OFF: BulbVisual = BulbVisual {
        color: colors::BULB_OFF,
        intensity: 0.0,
    };

    pub fn is_lit(&self) -> bool {
        self.intensity > GLOW_THRESHOLD
    }
}

/// Flash envelope: ramp up over the first 30%, hold, ramp down over the last 30%
pub fn flash_ease(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.3 {
        p / 0.3
    } else if p < 0.7 {
        1.0
    } else {
        1.0 - (p - 0.7) / 0.3
    }
}

/// Success shimmer as a function of wall-clock seconds
pub fn success_pulse(time_secs: f64) -> f32 {
    0.6 + (time_secs * 5.0).sin() as f32 * 0.4
}

/// Color and intensity of bulb `index` for the current phase
pub fn bulb_visual(state: &GameState, index: usize, time_secs: f64) -> BulbVisual {
    let Some(round) = state.round.as_ref() else {
        return BulbVisual::OFF;
    };
    let palette = |c: usize| colors::PALETTE.get(c).copied().unwrap_or(colors::BULB_OFF);
    let target = round.target().get(index).copied();
    let placed = round.player().get(index).copied().flatten();

    match state.phase {
        Phase::Flashing => match (state.flash, target) {
            (Some(cursor), Some(color)) if cursor.index == index => BulbVisual {
                color: palette(color),
                intensity: flash_ease(state.flash_progress()),
            },
            _ => BulbVisual::OFF,
        },
        Phase::Input | Phase::Checking => match placed {
            Some(color) => BulbVisual {
                color: palette(color),
                intensity: PLACED_INTENSITY,
            },
            None => BulbVisual::OFF,
        },
        Phase::Success => match target {
            Some(color) => BulbVisual {
                color: palette(color),
                intensity: success_pulse(time_secs),
            },
            None => BulbVisual::OFF,
        },
        Phase::Fail if round.is_wrong(index) => BulbVisual {
            color: colors::BULB_WRONG,
            intensity: WRONG_INTENSITY,
        },
        _ => BulbVisual::OFF,
    }
}

/// Wooden railing behind the string
pub fn railing() -> Vec<Vertex> {
    let (x, y, w, h) = (80.0, 150.0, 840.0, 130.0);
    let mut vertices = shapes::vertical_gradient(x, y, w, h, &colors::WOOD);

    for i in 0..15 {
        let y0 = 160.0 + i as f32 * 10.0;
        // Slight fixed slant per line so the grain is not ruler-straight
        let drift = ((i * 37) % 6) as f32;
        vertices.extend(shapes::line(
            Vec2::new(x, y0),
            Vec2::new(x + w, y0 + drift),
            1.0,
            colors::WOOD_GRAIN,
        ));
    }

    vertices.extend(shapes::rect_outline(x, y, w, h, 8.0, colors::WOOD_BORDER));
    vertices.extend(shapes::rect_outline(
        x + 8.0,
        y + 8.0,
        w - 16.0,
        h - 16.0,
        2.0,
        colors::WOOD_HIGHLIGHT,
    ));
    vertices
}

/// Points the wire passes through: both anchors plus one per socket
pub fn wire_points(count: usize) -> Vec<Vec2> {
    (0..=count + 1)
        .map(|i| {
            let x = if i == 0 {
                crate::consts::STRING_START_X
            } else {
                bulb_position(i - 1, count).x
            };
            Vec2::new(x, wire_height(i))
        })
        .collect()
}

/// The light string itself, with its drop shadow
pub fn string(count: usize) -> Vec<Vertex> {
    let points = wire_points(count);
    let shadow: Vec<Vec2> = points.iter().map(|p| *p + Vec2::new(0.0, 2.0)).collect();
    let mut vertices = shapes::polyline(&shadow, 4.0, colors::WIRE_SHADOW);
    vertices.extend(shapes::polyline(&points, 3.0, colors::WIRE));
    vertices
}

/// One bulb with its drop wire and socket
pub fn bulb(index: usize, count: usize, visual: BulbVisual) -> Vec<Vertex> {
    let center = bulb_position(index, count);
    let (x, y) = (center.x, center.y);
    let mut vertices = Vec::new();

    vertices.extend(shapes::line(
        Vec2::new(x, wire_height(index + 1)),
        Vec2::new(x, y - 20.0),
        2.0,
        colors::WIRE,
    ));
    vertices.extend(shapes::rect(x - 6.0, y - 22.0, 12.0, 8.0, colors::SOCKET));
    vertices.extend(shapes::rect_outline(
        x - 6.0,
        y - 22.0,
        12.0,
        8.0,
        1.0,
        colors::SOCKET_EDGE,
    ));

    if visual.is_lit() {
        let radius = 25.0 * (1.0 + visual.intensity * 0.3);
        // Wide soft halo standing in for the canvas shadow blur
        let halo = radius + 35.0 * visual.intensity * 0.5;
        let halo_color = with_alpha(visual.color, visual.intensity * 0.35);
        vertices.extend(shapes::glow(center, halo, halo_color, SEGMENTS));
        vertices.extend(shapes::glow(center, radius, visual.color, SEGMENTS));
        vertices.extend(shapes::radial_gradient(
            center,
            BULB_RADIUS,
            &[
                (0.0, visual.color),
                (0.7, visual.color),
                (1.0, with_alpha(visual.color, 0xAA as f32 / 255.0)),
            ],
            SEGMENTS,
        ));
    } else {
        vertices.extend(shapes::radial_gradient(
            center,
            BULB_RADIUS,
            &[(0.0, colors::BULB_OFF_HIGHLIGHT), (1.0, colors::BULB_OFF)],
            SEGMENTS,
        ));
    }

    // Glass reflection
    vertices.extend(shapes::radial_gradient(
        center + Vec2::new(-5.0, -5.0),
        12.0,
        &[
            (0.0, colors::GLASS_SHINE),
            (0.5, with_alpha(colors::GLASS_SHINE, 0.2)),
            (1.0, with_alpha(colors::GLASS_SHINE, 0.0)),
        ],
        SEGMENTS,
    ));
    vertices.extend(shapes::ring(
        center,
        BULB_RADIUS - 0.75,
        BULB_RADIUS + 0.75,
        colors::BULB_OUTLINE,
        SEGMENTS,
    ));
    vertices
}

/// Railing, string and every bulb for the current level
pub fn game_scene(state: &GameState, time_secs: f64) -> Vec<Vertex> {
    let count = state.bulb_count();
    let mut vertices = railing();
    vertices.extend(string(count));
    for i in 0..count {
        vertices.extend(bulb(i, count, bulb_visual(state, i, time_secs)));
    }
    vertices
}

/// Floating swatch following the pointer while a color is picked
pub fn drag_preview(state: &GameState) -> Vec<Vertex> {
    let (Some(color), Some(pos)) = (state.pending_color, state.drag_position) else {
        return Vec::new();
    };
    let Some(&rgb) = colors::PALETTE.get(color) else {
        return Vec::new();
    };
    let mut vertices = shapes::glow(pos, 55.0, with_alpha(rgb, 0.6), SEGMENTS);
    vertices.extend(shapes::circle(pos, 25.0, colors::DRAG_RIM, SEGMENTS));
    vertices.extend(shapes::circle(pos, 21.0, rgb, SEGMENTS));
    vertices
}

/// Intensity of decorative menu bulb `i`
pub fn menu_bulb_glow(i: usize, time_secs: f64) -> f32 {
    0.5 + (time_secs * 2.0 + i as f64).sin() as f32 * 0.5
}

/// Title card; the text itself is DOM overlay
pub fn menu(time_secs: f64) -> Vec<Vertex> {
    let mut vertices = shapes::rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, colors::MENU_SHADE);

    let (x, y, w, h) = (150.0, 100.0, 700.0, 400.0);
    vertices.extend(shapes::rect(x, y, w, h, colors::MENU_PANEL));
    let gold_haze = with_alpha(colors::GOLD, 0.2);
    vertices.extend(shapes::rect_outline(x - 4.0, y - 4.0, w + 8.0, h + 8.0, 12.0, gold_haze));
    vertices.extend(shapes::rect_outline(x, y, w, h, 6.0, colors::GOLD));

    // Corner brackets
    let c = 15.0;
    for (cx, cy, sx, sy) in [
        (x, y, 1.0, 1.0),
        (x + w, y, -1.0, 1.0),
        (x, y + h, 1.0, -1.0),
        (x + w, y + h, -1.0, -1.0),
    ] {
        let horiz_x = if sx > 0.0 { cx } else { cx - c * 3.0 };
        let horiz_y = if sy > 0.0 { cy } else { cy - c };
        vertices.extend(shapes::rect(horiz_x, horiz_y, c * 3.0, c, colors::GOLD));
        let vert_x = if sx > 0.0 { cx } else { cx - c };
        let vert_y = if sy > 0.0 { cy } else { cy - c * 3.0 };
        vertices.extend(shapes::rect(vert_x, vert_y, c, c * 3.0, colors::GOLD));
    }

    let bulb_y = 290.0;
    for i in 0..5 {
        let center = Vec2::new(300.0 + i as f32 * 100.0, bulb_y);
        let color = colors::PALETTE[i % 4];
        let glow = menu_bulb_glow(i, time_secs);

        let halo = with_alpha(color, 0.5 * glow);
        vertices.extend(shapes::glow(center, 15.0 + 20.0 * glow, halo, SEGMENTS));
        vertices.extend(shapes::radial_gradient(
            center,
            15.0,
            &[(0.0, color), (1.0, with_alpha(color, 0x88 as f32 / 255.0))],
            SEGMENTS,
        ));
        vertices.extend(shapes::circle(center, 12.0, color, SEGMENTS));
        let shine = center + Vec2::new(-4.0, -4.0);
        vertices.extend(shapes::circle(shine, 4.0, colors::GLASS_SHINE, 12));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FlashCursor, Round, Screen};

    fn playing(level: u32, target: Vec<usize>, phase: Phase) -> GameState {
        let mut state = GameState::new(1);
        state.screen = Screen::Playing;
        state.level = level;
        state.phase = phase;
        state.round = Round::with_target(level, target);
        state
    }

    #[test]
    fn test_flash_ease_envelope() {
        assert_eq!(flash_ease(0.0), 0.0);
        assert!((flash_ease(0.15) - 0.5).abs() < 1e-5);
        assert_eq!(flash_ease(0.3), 1.0);
        assert_eq!(flash_ease(0.5), 1.0);
        assert!((flash_ease(0.85) - 0.5).abs() < 1e-5);
        assert!(flash_ease(1.0).abs() < 1e-5);
    }

    #[test]
    fn test_only_flash_index_is_lit() {
        let mut state = playing(3, vec![0, 1, 2], Phase::Flashing);
        state.time_ticks = 36;
        state.flash = Some(FlashCursor {
            index: 1,
            started_tick: 0,
        });

        assert!(!bulb_visual(&state, 0, 0.0).is_lit());
        let lit = bulb_visual(&state, 1, 0.0);
        assert_eq!(lit.color, colors::PALETTE[1]);
        assert_eq!(lit.intensity, 1.0);
        assert!(!bulb_visual(&state, 2, 0.0).is_lit());

        // Tail pause: cursor past the end lights nothing
        state.flash = Some(FlashCursor {
            index: 3,
            started_tick: 0,
        });
        assert!((0..3).all(|i| !bulb_visual(&state, i, 0.0).is_lit()));
    }

    #[test]
    fn test_placed_colors_show_during_input_and_checking() {
        let mut state = playing(2, vec![0, 1], Phase::Input);
        state.round.as_mut().unwrap().place(1, 4);

        assert_eq!(bulb_visual(&state, 0, 0.0), BulbVisual::OFF);
        let placed = bulb_visual(&state, 1, 0.0);
        assert_eq!(placed.color, colors::PALETTE[4]);
        assert_eq!(placed.intensity, PLACED_INTENSITY);

        state.phase = Phase::Checking;
        assert_eq!(bulb_visual(&state, 1, 0.0), placed);
    }

    #[test]
    fn test_success_pulses_target_colors() {
        let state = playing(2, vec![3, 5], Phase::Success);
        let a = bulb_visual(&state, 1, 0.0);
        let b = bulb_visual(&state, 1, 0.3);
        assert_eq!(a.color, colors::PALETTE[5]);
        assert!((a.intensity - 0.6).abs() < 1e-5);
        assert!(b.intensity > a.intensity);
        assert!(b.intensity <= 1.0);
    }

    #[test]
    fn test_fail_dims_only_wrong_bulbs() {
        let mut state = playing(2, vec![0, 1], Phase::Fail);
        let round = state.round.as_mut().unwrap();
        round.place(0, 0);
        round.place(1, 2);

        assert_eq!(bulb_visual(&state, 0, 0.0), BulbVisual::OFF);
        let wrong = bulb_visual(&state, 1, 0.0);
        assert_eq!(wrong.color, colors::BULB_WRONG);
        assert_eq!(wrong.intensity, WRONG_INTENSITY);
        assert!(wrong.is_lit());
    }

    #[test]
    fn test_no_round_is_dark() {
        let mut state = GameState::new(1);
        state.screen = Screen::Playing;
        state.phase = Phase::Ready;
        assert_eq!(bulb_visual(&state, 0, 0.0), BulbVisual::OFF);
    }

    #[test]
    fn test_wire_spans_string_bounds() {
        let points = wire_points(3);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].x, crate::consts::STRING_START_X);
        assert!((points[4].x - crate::consts::STRING_END_X).abs() < 1e-3);
    }

    #[test]
    fn test_drag_preview_needs_color_and_position() {
        let mut state = playing(1, vec![0], Phase::Input);
        assert!(drag_preview(&state).is_empty());
        state.pending_color = Some(2);
        assert!(drag_preview(&state).is_empty());
        state.drag_position = Some(Vec2::new(400.0, 300.0));
        assert!(!drag_preview(&state).is_empty());
    }

    #[test]
    fn test_menu_bulbs_pulse_between_zero_and_one() {
        for step in 0..100 {
            let t = step as f64 * 0.05;
            for i in 0..5 {
                let g = menu_bulb_glow(i, t);
                assert!((0.0..=1.0).contains(&g));
            }
        }
        assert!(!menu(0.0).is_empty());
    }
}

//! Christmas Lights Memory entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use lights_memory::consts::*;
    use lights_memory::renderer::{RenderState, Renderer};
    use lights_memory::sim::{GameState, InputEvent, Phase, advance, apply_input};
    use lights_memory::{screen_to_canvas, tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::with_tuning(seed, tuning::load_from_page()),
                renderer: Renderer::new(seed.wrapping_add(1)),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        fn input(&mut self, event: InputEvent) {
            apply_input(&mut self.state, event);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            advance(&mut self.state, &mut self.accumulator, dt);
        }

        /// Forward controller events to the renderer
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                log::debug!("Event: {:?}", event);
                self.renderer.handle_event(&event);
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let vertices = self.renderer.frame(&self.state, time / 1000.0);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = &self.state;
            let playing = state.is_playing();

            set_hidden(document, "menu", playing);
            set_hidden(document, "menu-footer", playing);
            set_hidden(document, "hud", !playing);
            set_hidden(document, "controls", !(playing && state.phase == Phase::Input));

            set_text(document, "#hud-level .hud-value", &state.level.to_string());
            set_text(document, "#hud-score .hud-value", &state.score.to_string());

            // Double toggle is only offered past level 1
            set_hidden(document, "double-container", !state.can_toggle_double());
            if let Some(toggle) = document
                .get_element_by_id("double-toggle")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                if toggle.checked() != state.double_mode {
                    toggle.set_checked(state.double_mode);
                }
            }

            let palette = state.palette_size();
            for i in 0..MAX_PALETTE {
                if let Some(el) = document.get_element_by_id(&format!("swatch-{}", i)) {
                    let _ = el.class_list().toggle_with_force("hidden", i >= palette);
                    let selected = state.pending_color == Some(i);
                    let _ = el.class_list().toggle_with_force("selected", selected);
                }
            }

            if let Some(btn) = document.get_element_by_id("repeat-btn") {
                if state.can_repeat() {
                    let _ = btn.remove_attribute("disabled");
                } else {
                    let _ = btn.set_attribute("disabled", "");
                }
            }
            let label = if state.repeat_cooldown > 0 {
                state.repeat_cooldown.to_string()
            } else {
                "REPEAT".to_string()
            };
            set_text(document, "#repeat-btn .label", &label);
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Seed from the OS RNG, falling back to the clock
    fn random_seed() -> u64 {
        let mut bytes = [0u8; 8];
        match getrandom::fill(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(e) => {
                log::warn!("getrandom failed ({}), seeding from clock", e);
                js_sys::Date::now() as u64
            }
        }
    }

    /// Canvas-space position of a mouse event
    fn event_position(canvas: &HtmlCanvasElement, event: &MouseEvent) -> glam::Vec2 {
        screen_to_canvas(
            event.offset_x() as f32,
            event.offset_y() as f32,
            canvas.client_width() as f32,
            canvas.client_height() as f32,
        )
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Christmas Lights Memory starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = backing_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = random_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Prefer WebGPU, fall back to WebGL2 where the browser lacks it
        let has_webgpu =
            js_sys::Reflect::has(&window.navigator(), &JsValue::from_str("gpu")).unwrap_or(false);
        let backends = if has_webgpu {
            wgpu::Backends::BROWSER_WEBGPU
        } else {
            log::warn!("WebGPU unavailable, using WebGL");
            wgpu::Backends::GL
        };
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .expect("Failed to create device");
        game.borrow_mut().render_state = Some(render_state);

        setup_canvas_handlers(&canvas, game.clone());
        setup_controls(&document, game.clone());
        setup_keyboard(game.clone());

        request_animation_frame(game, canvas);

        log::info!("Christmas Lights Memory running!");
    }

    /// Canvas backing store size for the current CSS size and pixel ratio
    fn backing_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn setup_canvas_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click: start from the menu, or place the pending color
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = event_position(&canvas_clone, &event);
                game.borrow_mut().input(InputEvent::Click(pos));
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move: drag preview
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = event_position(&canvas_clone, &event);
                game.borrow_mut().input(InputEvent::PointerMove(pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse leave: hide the preview
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input(InputEvent::PointerLeave);
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(document: &Document, game: Rc<RefCell<Game>>) {
        for i in 0..MAX_PALETTE {
            if let Some(swatch) = document.get_element_by_id(&format!("swatch-{}", i)) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().input(InputEvent::SelectColor(i));
                });
                let _ = swatch
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("repeat-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input(InputEvent::Repeat);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(toggle) = document
            .get_element_by_id("double-toggle")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let toggle_clone = toggle.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.input(InputEvent::SetDoubleMode(toggle_clone.checked()));
                // A rejected change snaps the checkbox back
                toggle_clone.set_checked(g.state.double_mode);
            });
            let _ =
                toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.repeat() {
                return;
            }
            let mut g = game.borrow_mut();
            let key = event.key();
            let input = match key.as_str() {
                "1" | "2" | "3" | "4" | "5" | "6" => key
                    .parse::<usize>()
                    .ok()
                    .map(|n| InputEvent::SelectColor(n - 1)),
                "r" | "R" => Some(InputEvent::Repeat),
                "d" | "D" => Some(InputEvent::SetDoubleMode(!g.state.double_mode)),
                _ => None,
            };
            if let Some(input) = input {
                g.input(input);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, canvas, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            // Follow CSS size changes
            let (width, height) = backing_size(&canvas);
            if let Some(ref mut render_state) = g.render_state {
                if render_state.size != (width, height) {
                    canvas.set_width(width);
                    canvas.set_height(height);
                    render_state.resize(width, height);
                }
            }

            g.update(dt);
            g.dispatch_events();
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game, canvas);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Christmas Lights Memory (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025);
    let (level, score) = headless_demo(seed, 6);
    println!("Reached level {} with score {}", level, score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play rounds by reading the target and placing it, until `target_level`
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(seed: u64, target_level: u32) -> (u32, u64) {
    use lights_memory::bulb_position;
    use lights_memory::consts::TICK_RATE;
    use lights_memory::renderer::Renderer;
    use lights_memory::sim::{GameState, InputEvent, Phase, apply_input, tick};

    let mut state = GameState::new(seed);
    let mut renderer = Renderer::new(seed);
    apply_input(&mut state, InputEvent::Click(glam::Vec2::ZERO));

    // Generous cap: every round finishes in a few seconds of game time
    let max_ticks = target_level as u64 * 30 * TICK_RATE as u64;
    while state.level < target_level && state.time_ticks < max_ticks {
        tick(&mut state);

        if state.phase == Phase::Input {
            let target = state.round.as_ref().map(|r| r.target().to_vec());
            for (slot, color) in target.into_iter().flatten().enumerate() {
                let pos = bulb_position(slot, state.bulb_count());
                apply_input(&mut state, InputEvent::SelectColor(color));
                apply_input(&mut state, InputEvent::Click(pos));
            }
        }
        if state.level >= 3 && state.can_toggle_double() && !state.double_mode {
            apply_input(&mut state, InputEvent::SetDoubleMode(true));
        }

        for event in state.drain_events() {
            renderer.handle_event(&event);
        }
        let frame = renderer.frame(&state, state.time_ticks as f64 / TICK_RATE as f64);
        log::trace!("Frame with {} vertices", frame.len());
    }

    (state.level, state.score)
}

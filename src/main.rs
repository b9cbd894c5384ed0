//! Jelly Pop entry point
//!
//! On the web this wires the canvas, pointer, keyboard and audio to the
//! simulation and runs the frame loop. Natively it runs a headless sweep.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use jelly_pop::Settings;
    use jelly_pop::audio::{AudioManager, SoundEffect};
    use jelly_pop::renderer::{CanvasSurface, draw_frame};
    use jelly_pop::sim::{
        GameEvent, PointerSample, SimPhase, SimState, pointer_move, reset_pointer,
        set_creatures_enabled, skip_to_level, tick, toggle_pause,
    };

    /// How long the level banner stays up (ms)
    const BANNER_MS: i32 = 1800;

    /// Page instance holding all state
    struct Game {
        state: SimState,
        settings: Settings,
        audio: AudioManager,
        surface: CanvasSurface,
        /// Pending animation frame, cancelled on pause
        raf_id: Option<i32>,
    }

    impl Game {
        fn new(seed: u64, mut surface: CanvasSurface, dpr: f64) -> Self {
            let settings = Settings::load();
            let viewport = surface.fit_to_client(dpr);
            let mut state = SimState::new(seed, viewport);
            state.set_quality(settings.quality);
            set_creatures_enabled(&mut state, settings.creatures_enabled);
            let audio = AudioManager::new(&settings);
            Self {
                state,
                settings,
                audio,
                surface,
                raf_id: None,
            }
        }

        /// Feed one pointer sample in CSS pixels relative to the canvas
        fn pointer(&mut self, x: f32, y: f32) {
            let sample = PointerSample::new(x, y, now_ms());
            let interaction = self.settings.effective_interaction();
            pointer_move(&mut self.state, sample, &interaction);
            self.pump_events();
        }

        fn frame(&mut self, time: f64) {
            tick(&mut self.state, time);
            draw_frame(&mut self.surface, &self.state);
            self.pump_events();
            self.update_hud();
        }

        /// Hand queued simulation events to audio and the banner
        fn pump_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Popped { .. } => {
                        let note = self.state.progress.total_pops as u32;
                        self.audio.play(SoundEffect::Pop { note });
                    }
                    GameEvent::LevelAdvanced { level } => {
                        self.audio.play(SoundEffect::LevelUp);
                        show_banner(&format!("Level {}", level));
                    }
                    GameEvent::GameWon => {
                        self.audio.play(SoundEffect::Win);
                        show_banner("All levels cleared!");
                    }
                    GameEvent::Paused => self.audio.suspend(),
                    GameEvent::Resumed => self.audio.resume(),
                    // Already logged by the simulation
                    GameEvent::ChimeSuppressed { .. } => {}
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let progress = &self.state.progress;

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&progress.level.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-pops .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!(
                    "{}/{}",
                    progress.pops_this_level, progress.pops_required
                )));
            }
            if let Some(el) = document.get_element_by_id("hud-safe") {
                let class = if self.settings.safe_mode {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if self.state.phase == SimPhase::Paused {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        fn resize(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let viewport = self.surface.fit_to_client(dpr);
            self.state.set_viewport(viewport);
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map_or_else(js_sys::Date::now, |p| p.now())
    }

    /// Flash a line of text in the level banner, hiding it again after a moment
    fn show_banner(text: &str) {
        let Some(window) = web_sys::window() else { return };
        let Some(el) = window.document().and_then(|d| d.get_element_by_id("level-banner")) else {
            return;
        };
        el.set_text_content(Some(text));
        let _ = el.set_attribute("class", "show");

        let hide = Closure::once(move || {
            let _ = el.set_attribute("class", "");
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            hide.as_ref().unchecked_ref(),
            BANNER_MS,
        );
        hide.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Jelly Pop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let surface = match CanvasSurface::new(canvas.clone()) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Canvas 2D unavailable: {:?}", e);
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            surface,
            window.device_pixel_ratio(),
        )));
        log::info!("Simulation seeded with {}", seed);

        setup_pointer_handlers(&canvas, game.clone());
        setup_keyboard(game.clone());
        setup_resize(game.clone());
        setup_auto_pause(game.clone());

        game.borrow().update_hud();
        request_animation_frame(game);

        log::info!("Jelly Pop running!");
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .pointer(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().pointer(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // A new touch, a lifted finger, or the mouse leaving ends the current swipe
        for name in ["touchstart", "touchend", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                reset_pointer(&mut game.borrow_mut().state);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Any press unlocks audio (browsers need a user gesture)
        for name in ["mousedown", "touchstart"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.state.phase != SimPhase::Paused {
                    g.audio.resume();
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let handler = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                "Escape" | " " => {
                    event.prevent_default();
                    set_paused(&handler, None);
                }
                "s" | "S" => {
                    let mut g = handler.borrow_mut();
                    let enabled = !g.settings.safe_mode;
                    g.settings.set_safe_mode(enabled);
                    g.settings.save();
                }
                "c" | "C" => {
                    let mut g = handler.borrow_mut();
                    let enabled = !g.settings.creatures_enabled;
                    g.settings.creatures_enabled = enabled;
                    g.settings.save();
                    set_creatures_enabled(&mut g.state, enabled);
                }
                "m" | "M" => {
                    let mut g = handler.borrow_mut();
                    let muted = !g.audio.is_muted();
                    g.audio.set_muted(muted);
                    log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                }
                "q" | "Q" => {
                    let mut g = handler.borrow_mut();
                    let quality = g.settings.quality.next();
                    g.settings.quality = quality;
                    g.settings.save();
                    g.state.set_quality(quality);
                    log::info!("Quality: {}", quality.as_str());
                }
                // Debug: skip to next level
                "+" | "=" => {
                    let mut g = handler.borrow_mut();
                    let next = g.state.progress.level + 1;
                    skip_to_level(&mut g.state, next);
                    g.pump_events();
                }
                _ => return,
            }
            handler.borrow().update_hud();
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    log::info!("Auto-paused (tab hidden)");
                    set_paused(&game, Some(true));
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if game.borrow().settings.pause_on_blur {
                    log::info!("Auto-paused (window blur)");
                    set_paused(&game, Some(true));
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause, resume, or toggle (`None`), stopping or restarting the frame loop
    fn set_paused(game: &Rc<RefCell<Game>>, paused: Option<bool>) {
        let restart_loop = {
            let mut g = game.borrow_mut();
            let is_paused = g.state.phase == SimPhase::Paused;
            if paused == Some(is_paused) {
                return;
            }
            let now_paused = toggle_pause(&mut g.state);
            g.pump_events();
            g.update_hud();

            if now_paused {
                if let (Some(id), Some(window)) = (g.raf_id.take(), web_sys::window()) {
                    let _ = window.cancel_animation_frame(id);
                }
                false
            } else {
                g.raf_id.is_none()
            }
        };

        if restart_loop {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let handle = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(handle, time);
        });
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            game.borrow_mut().raf_id = Some(id);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.raf_id = None;
            if g.state.phase == SimPhase::Paused {
                return;
            }
            g.frame(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 5);

    log::info!("Jelly Pop (native) - headless sweep, seed {}, {} frames", seed, frames);
    log::info!("The interactive version runs in the browser: `trunk serve`");

    headless::sweep(seed, frames);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use jelly_pop::consts::FRAME_MS;
    use jelly_pop::sim::{GameEvent, PointerSample, SimPhase, SimState, Viewport, pointer_move, tick};
    use jelly_pop::{Settings, unit_toward};

    /// Pointer speed of the scripted swipe (px per frame)
    const SWIPE_STEP: f32 = 14.0;

    /// Drive the simulation with a pointer that chases the oldest live
    /// creature, logging what happens
    pub fn sweep(seed: u64, frames: u64) {
        let mut state = SimState::new(seed, Viewport::new(1280.0, 720.0));
        let interaction = Settings::default().effective_interaction();
        let mut pointer = Vec2::new(640.0, 360.0);
        let mut pops = 0u32;
        let mut suppressed = 0u32;

        for frame in 0..frames {
            let now = frame as f64 * FRAME_MS;
            tick(&mut state, now);

            let target = state
                .creatures
                .iter()
                .find(|c| !c.is_disappearing())
                .map(|c| c.pos);
            if let Some(target) = target {
                pointer += unit_toward(pointer, target) * SWIPE_STEP;
                pointer_move(
                    &mut state,
                    PointerSample::new(pointer.x, pointer.y, now + FRAME_MS * 0.5),
                    &interaction,
                );
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::Popped { .. } => pops += 1,
                    GameEvent::ChimeSuppressed { .. } => suppressed += 1,
                    GameEvent::LevelAdvanced { level } => {
                        log::info!("Frame {}: reached level {}", frame, level)
                    }
                    _ => {}
                }
            }

            if state.phase == SimPhase::Won {
                log::info!("Won after {} frames", frame + 1);
                break;
            }
        }

        log::info!(
            "Sweep done: level {}, {} pops ({} suppressed chimes), {} creatures, {} particles",
            state.progress.level,
            pops,
            suppressed,
            state.creatures.len(),
            state.particles.len()
        );
    }
}

//! Slice Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use slice_rush::audio::WebAudio;
    use slice_rush::highscores::LocalStorageStore;
    use slice_rush::sim::state::BOMB_PALETTE;
    use slice_rush::sim::{EntityKind, Field, Screen, SimRng, control_region};
    use slice_rush::{Engine, Settings};

    /// Game instance: engine plus the browser pieces it draws into
    struct Game {
        engine: Engine,
        audio: Rc<RefCell<WebAudio>>,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn css(color: u32) -> String {
        format!("#{:06x}", color & 0xff_ffff)
    }

    impl Game {
        /// Match the backing store to the CSS size and tell the engine
        fn fit_canvas(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let w = self.canvas.client_width().max(1);
            let h = self.canvas.client_height().max(1);
            self.canvas.set_width((w as f64 * dpr) as u32);
            self.canvas.set_height((h as f64 * dpr) as u32);
            let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
            self.engine.resize(w as f32, h as f32);
        }

        /// Client coordinates to field coordinates
        fn to_field(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            )
        }

        fn press(&mut self, point: Vec2) {
            // Browsers only allow audio after a user gesture
            self.audio.borrow().unlock();
            self.engine.pointer_down_at(point, now_ms());
        }

        fn circle(&self, center: Vec2, radius: f32) {
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(center.x as f64, center.y as f64, radius.max(0.5) as f64, 0.0, TAU);
            self.ctx.fill();
        }

        fn render(&self, time: f64) {
            let snap = self.engine.snapshot();
            let ctx = &self.ctx;
            let Field { width, height } = snap.field;
            let (w, h) = (width as f64, height as f64);

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#0b0f1a");
            ctx.fill_rect(0.0, 0.0, w, h);

            // Entities
            for entity in snap.entities.iter().filter(|e| !e.sliced) {
                let (fill, accent) = match entity.kind {
                    EntityKind::Standard(kind) => {
                        let palette = kind.palette();
                        (palette[0], palette[palette.len() - 1])
                    }
                    EntityKind::Bomb => (0x1a1a1a, BOMB_PALETTE[0]),
                };
                ctx.save();
                let _ = ctx.translate(entity.pos.x as f64, entity.pos.y as f64);
                let _ = ctx.rotate(entity.rotation as f64);
                ctx.set_fill_style_str(&css(fill));
                self.circle(Vec2::ZERO, entity.size / 2.0);
                ctx.set_fill_style_str(&css(accent));
                let mark = entity.size as f64 / 4.0;
                ctx.fill_rect(-mark / 2.0, -entity.size as f64 / 2.0, mark, mark);
                ctx.restore();
            }

            // Particles
            for particle in snap.particles {
                ctx.set_global_alpha(particle.life_fraction().clamp(0.0, 1.0) as f64);
                ctx.set_fill_style_str(&css(particle.color));
                self.circle(particle.pos, particle.size / 2.0);
            }
            ctx.set_global_alpha(1.0);

            // Blade trail
            if snap.trail.len() >= 2 {
                ctx.set_stroke_style_str("#e8f6ff");
                ctx.set_line_width(4.0);
                ctx.set_line_cap("round");
                ctx.begin_path();
                ctx.move_to(snap.trail[0].pos.x as f64, snap.trail[0].pos.y as f64);
                for point in &snap.trail[1..] {
                    ctx.line_to(point.pos.x as f64, point.pos.y as f64);
                }
                ctx.stroke();
            }

            // HUD
            let summary = snap.summary;
            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("bold 24px sans-serif");
            ctx.set_text_align("left");
            let _ = ctx.fill_text(&format!("Score {}", summary.score), 16.0, 36.0);
            ctx.set_font("16px sans-serif");
            let _ = ctx.fill_text(&format!("Best {}", summary.high_score), 16.0, 60.0);

            let shake = if summary.life_lost_shake {
                (time * 0.08).sin() * 4.0
            } else {
                0.0
            };
            ctx.set_font("24px sans-serif");
            ctx.set_text_align("right");
            ctx.set_fill_style_str("#ff4d6d");
            let hearts = "\u{2665} ".repeat(summary.lives as usize);
            let _ = ctx.fill_text(hearts.trim_end(), w - 16.0 + shake, 36.0);

            ctx.set_text_align("center");
            if let Some(combo) = summary.combo_display {
                ctx.set_fill_style_str("#ffd000");
                ctx.set_font("bold 40px sans-serif");
                let _ = ctx.fill_text(&format!("{}x COMBO!", combo.combo), w / 2.0, h * 0.3);
            }

            // Screen overlays
            let overlay = match summary.screen {
                Screen::Start => Some(("SLICE RUSH", "START".to_string())),
                Screen::GameOver => Some(("GAME OVER", format!("RESTART ({})", summary.score))),
                Screen::Playing => None,
            };
            if let Some((title, label)) = overlay {
                ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
                ctx.fill_rect(0.0, 0.0, w, h);
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("bold 48px sans-serif");
                let _ = ctx.fill_text(title, w / 2.0, h * 0.4);

                let region = control_region(&snap.field);
                let size = region.max - region.min;
                ctx.set_fill_style_str("#3a86ff");
                ctx.fill_rect(
                    region.min.x as f64,
                    region.min.y as f64,
                    size.x as f64,
                    size.y as f64,
                );
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("bold 24px sans-serif");
                let mid = (region.min + region.max) / 2.0;
                let _ = ctx.fill_text(&label, mid.x as f64, mid.y as f64 + 8.0);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }
        log::info!("Slice Rush starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> found");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let settings = Settings::load();
        let audio = Rc::new(RefCell::new(WebAudio::new(settings.effective_volume())));
        let seed = js_sys::Date::now() as u64;
        let field = Field::new(
            canvas.client_width().max(1) as f32,
            canvas.client_height().max(1) as f32,
        );
        let engine = Engine::new(field, now_ms())
            .with_rng(SimRng::new(seed))
            .with_settings(settings)
            .with_store(LocalStorageStore)
            .with_audio(audio.clone());
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            engine,
            audio,
            canvas: canvas.clone(),
            ctx,
        }));
        game.borrow_mut().fit_canvas();

        setup_input_handlers(&canvas, game.clone());
        setup_window_handlers(game.clone());

        request_animation_frame(game);
        log::info!("Slice Rush running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down: start/restart controls or a new gesture
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = g.to_field(event.client_x(), event.client_y());
                g.press(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move: gesture samples (ignored unless a gesture is active)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = g.to_field(event.client_x(), event.client_y());
                g.engine.gesture_move_at(point, now_ms());
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave: finish the gesture
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().engine.gesture_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let point = g.to_field(touch.client_x(), touch.client_y());
                    g.press(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let point = g.to_field(touch.client_x(), touch.client_y());
                    g.engine.gesture_move_at(point, now_ms());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().engine.gesture_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_canvas();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tab hidden: drop the gesture so no stale swipe resumes later
        if let Some(document) = window.document() {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().engine.gesture_end();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Page teardown
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().engine.destroy();
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.engine.frame(time) {
                log::info!("Game loop stopped");
                return;
            }
            g.render(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Slice Rush (native) starting...");
    log::info!("Native mode plays a headless autopilot session - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    run_autopilot(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one session with the autopilot at a fixed 16 ms frame rate
#[cfg(not(target_arch = "wasm32"))]
fn run_autopilot(seed: u64) {
    use std::cell::RefCell;
    use std::rc::Rc;

    use slice_rush::audio::{AudioCue, CueLog};
    use slice_rush::sim::autopilot::AutopilotAction;
    use slice_rush::sim::{Autopilot, Field, Screen, SimRng};
    use slice_rush::{Engine, MemoryStore};

    const FRAME_MS: f64 = 16.0;
    // Five minutes of play
    const MAX_FRAMES: u32 = 5 * 60 * 60;

    let field = Field::new(1280.0, 720.0);
    let audio = Rc::new(RefCell::new(CueLog::default()));
    let store = Rc::new(RefCell::new(MemoryStore::default()));
    let mut engine = Engine::new(field, 0.0)
        .with_rng(SimRng::new(seed))
        .with_store(store.clone())
        .with_audio(audio.clone());
    let mut pilot = Autopilot::new(field.center());

    engine.begin();
    let mut now = 0.0;
    let mut frames = 0;
    while engine.state().screen == Screen::Playing && frames < MAX_FRAMES {
        now += FRAME_MS;
        engine.frame(now);
        match pilot.plan(engine.state()) {
            AutopilotAction::Begin(point) => engine.gesture_begin(point),
            AutopilotAction::Move(point) => {
                engine.gesture_move(point);
            }
            AutopilotAction::End => {
                engine.gesture_end();
            }
            AutopilotAction::Idle => {}
        }
        frames += 1;
    }
    engine.destroy();

    let state = engine.state();
    let cues = audio.borrow();
    println!(
        "seed {seed}: score {} in {:.1}s (difficulty {:.1}, {} sliced, {} lives left)",
        state.score, state.elapsed, state.difficulty.level, state.total_sliced, state.lives
    );
    println!(
        "cues: {} slices, {} bombs thrown, {} bombs exploded; high score {} ({} saves)",
        cues.count(AudioCue::Slice),
        cues.count(AudioCue::BombThrown),
        cues.count(AudioCue::BombExploded),
        engine.high_score(),
        store.borrow().writes
    );
}

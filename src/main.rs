//! Brick Fall entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use brick_fall::platform::web::{load_tuning, read_image_pixels};
    use brick_fall::renderer::SpriteRenderState;
    use brick_fall::scene::Scene;
    use brick_fall::{GameLoop, KeyResponse, LoopStatus};

    /// Game instance holding all state
    struct Game {
        game_loop: GameLoop,
        render_state: Option<SpriteRenderState>,
    }

    impl Game {
        /// Run one frame; returns whether another should be scheduled
        fn frame(&mut self, time: f64) -> bool {
            let Some(frame) = self.game_loop.frame(time) else {
                return false;
            };
            self.render(&frame.scene);
            update_overlay(&frame.scene);
            frame.status == LoopStatus::Running
        }

        /// Render the current frame
        fn render(&mut self, scene: &Scene) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(scene) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Show the end-screen text, or hide the overlay while playing
    fn update_overlay(scene: &Scene) {
        let Some(document) = document() else {
            return;
        };
        let Some(overlay) = document.get_element_by_id("game-over") else {
            return;
        };

        if scene.is_game_over() {
            let lines = scene.text_lines();
            for (id, line) in ["game-over-title", "game-over-hint"].iter().zip(lines) {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&line.text));
                    let [r, g, b, _] = line.color.map(|c| (c * 255.0) as u8);
                    let _ = el.set_attribute(
                        "style",
                        &format!("font-size: {}px; color: rgb({r}, {g}, {b})", line.size_px),
                    );
                }
            }
            let _ = overlay.set_attribute("class", "");
        } else {
            let _ = overlay.set_attribute("class", "hidden");
        }
    }

    pub async fn run() -> Result<(), String> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| e.to_string())?;

        log::info!("Brick Fall starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        let tuning = load_tuning(&document);

        // Backing store at device resolution; CSS keeps the logical size
        let dpr = window.device_pixel_ratio();
        let width = (tuning.arena_width as f64 * dpr) as u32;
        let height = (tuning.arena_height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let sprites = read_image_pixels(&document, "sprite").await?;
        let bricks = read_image_pixels(&document, "bricks").await?;

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            game_loop: GameLoop::new(seed, tuning),
            render_state: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to get adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SpriteRenderState::new(
            surface,
            &adapter,
            width,
            height,
            (tuning.arena_width, tuning.arena_height),
            &sprites,
            &bricks,
        )
        .await
        .map_err(|e| e.to_string())?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Brick Fall running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down: movement, and restart on the end screen
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let response = game.borrow_mut().game_loop.key_down(&event.key());
                match response {
                    KeyResponse::Ignored => {}
                    KeyResponse::Buffered => event.prevent_default(),
                    KeyResponse::RestartRequested => {
                        let seed = js_sys::Date::now() as u64;
                        let restarted = game.borrow_mut().game_loop.restart(seed);
                        if restarted {
                            log::info!("Game restarted with seed: {}", seed);
                            request_animation_frame(game.clone());
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().game_loop.key_up(&event.key()) == KeyResponse::Buffered {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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
        let keep_going = game.borrow_mut().frame(time);

        // Stopped: the restart key re-arms the loop
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(err) = wasm_game::run().await {
        log::error!("Brick Fall failed to start: {err}");
    }
}

/// Frames the headless runner plays before giving up on a game over
#[cfg(not(target_arch = "wasm32"))]
const MAX_HEADLESS_FRAMES: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brick_fall::consts::FRAME_MS;
    use brick_fall::sim::{Autopilot, GameEvent};
    use brick_fall::{GameLoop, Tuning};

    env_logger::init();
    log::info!("Brick Fall (native) starting...");
    log::info!("Native mode runs a headless autopilot game - run with `trunk serve` for the web version");

    let args = RunnerArgs::parse(std::env::args().skip(1));
    let mut tuning = match &args.tuning_path {
        Some(path) => load_tuning_file(path),
        None => Tuning::default(),
    };
    if let Some(timing) = args.timing {
        tuning.game_over_timing = timing;
    }

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut game = GameLoop::new(seed, tuning);
    let mut autopilot = Autopilot::new();
    let mut destroyed = 0usize;
    let mut now = 0.0;

    while game.is_running() && game.state().frame < MAX_HEADLESS_FRAMES {
        for event in autopilot.keys(game.state()) {
            game.push_event(event);
        }
        let Some(frame) = game.frame(now) else {
            break;
        };
        for event in &frame.events {
            match event {
                GameEvent::BrickDestroyed { column, row } => {
                    destroyed += 1;
                    log::debug!("Brick ({column}, {row}) destroyed");
                }
                GameEvent::CollapseStarted => log::info!("Ball lost at frame {}", game.state().frame),
                GameEvent::GameOver => log::info!("Game over at frame {}", game.state().frame),
                _ => {}
            }
        }
        now += FRAME_MS;
    }

    let state = game.state();
    if state.flags.is_game_over() {
        log::info!(
            "Finished: {} bricks destroyed, {} still standing, {} frames",
            destroyed,
            state.bricks.active_count(),
            state.frame
        );
    } else {
        log::info!(
            "Stopped after {} frames without a game over ({} bricks destroyed)",
            state.frame,
            destroyed
        );
    }
}

/// Command line: `brick-fall [--timing=<wall-clock|frame-counted>] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, PartialEq)]
struct RunnerArgs {
    tuning_path: Option<String>,
    timing: Option<brick_fall::GameOverTiming>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RunnerArgs {
    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            if let Some(name) = arg.strip_prefix("--timing=") {
                match brick_fall::GameOverTiming::from_str(name) {
                    Some(timing) => parsed.timing = Some(timing),
                    None => log::warn!("Unknown game-over timing '{name}'; keeping the tuning's"),
                }
            } else if arg.starts_with("--") {
                log::warn!("Ignoring unknown option {arg}");
            } else {
                parsed.tuning_path = Some(arg);
            }
        }
        parsed
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning_file(path: &str) -> brick_fall::Tuning {
    use brick_fall::Tuning;

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("Can't read tuning file {path}: {err}; using defaults");
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(err) => {
            log::warn!("Invalid tuning file {path}: {err}; using defaults");
            Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

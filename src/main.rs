//! Code Blaster entry point
//!
//! On the web this wires the page (canvas, editor, buttons, keyboard) to a
//! `Game` and drives it from `requestAnimationFrame`. Natively it runs a
//! scripted headless session and prints the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlTextAreaElement};

    use code_blaster::platform::web::{self, DomHud, ids};
    use code_blaster::platform::{dispatch_events, fps};
    use code_blaster::renderer::canvas::CanvasSurface;
    use code_blaster::{Challenge, Game};

    /// Everything the page callbacks share
    struct App {
        game: Game,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        hud: DomHud,
    }

    impl App {
        fn flush_events(&mut self) {
            let events = self.game.drain_events();
            dispatch_events(&events, &mut self.hud);
        }

        fn editor(&self) -> Option<HtmlTextAreaElement> {
            web_sys::window()?
                .document()?
                .get_element_by_id(ids::EDITOR)?
                .dyn_into()
                .ok()
        }

        /// Run whatever is in the editor
        fn run_editor_code(&mut self) {
            let Some(editor) = self.editor() else {
                log::warn!("#{} not found", ids::EDITOR);
                return;
            };
            match self.game.apply_source(&editor.value()) {
                Ok(()) => self.hud.clear_error(),
                Err(e) => self.hud.show_error(&e),
            }
            self.flush_events();
        }

        /// Replace the editor text with generated code and apply it
        fn load_code(&mut self, result: Result<String, code_blaster::ConfigError>) {
            match result {
                Ok(source) => {
                    if let Some(editor) = self.editor() {
                        editor.set_value(&source);
                    }
                    self.hud.clear_error();
                }
                Err(e) => self.hud.show_error(&e),
            }
            self.flush_events();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Code Blaster starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            web_sys::console::error_1(&"no document".into());
            return;
        };
        let Some((canvas, ctx)) = web::canvas_context(&document) else {
            log::error!("#{} is missing or has no 2d context", ids::CANVAS);
            return;
        };

        let playfield = web::measure_playfield(&document);
        web::size_canvas(&canvas, &playfield);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(playfield, seed),
            surface: CanvasSurface::new(ctx),
            canvas,
            hud: DomHud::new(document.clone()),
        }));
        log::info!("Game initialized with seed: {}", seed);

        // Show the starter code without starting a session
        if let Some(editor) = app.borrow().editor() {
            editor.set_value(&code_blaster::Config::starter().to_source());
        }

        setup_keyboard(app.clone());
        setup_buttons(&document, app.clone());
        setup_resize(app.clone());

        request_animation_frame(app);
        log::info!("Code Blaster running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Leave typing in the editor alone
                let in_editor = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
                    .is_some();
                if in_editor {
                    return;
                }
                if app.borrow_mut().game.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: nothing stays held while focus is elsewhere
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.release_keys();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(
        document: &web_sys::Document,
        id: &str,
        app: &Rc<RefCell<App>>,
        action: impl Fn(&mut App) + 'static,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::debug!("#{} not on this page", id);
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut a = app.borrow_mut();
            action(&mut a);
            a.flush_events();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        on_click(document, "start-btn", &app, |a| a.game.start_game());
        on_click(document, "pause-btn", &app, |a| a.game.pause_game());
        on_click(document, "reset-btn", &app, |a| a.game.reset_game());
        on_click(document, "restart-btn", &app, |a| {
            a.game.reset_game();
            a.game.start_game();
        });
        on_click(document, "run-code-btn", &app, App::run_editor_code);
        on_click(document, "reset-code-btn", &app, |a| {
            let result = a.game.apply_starter();
            a.load_code(result);
        });

        for challenge in Challenge::ALL {
            let id = format!("challenge-{}", challenge.as_str());
            on_click(document, &id, &app, move |a| {
                let result = a.game.apply_preset(challenge);
                a.load_code(result);
            });
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let playfield = web::measure_playfield(&document);
            let mut a = app.borrow_mut();
            web::size_canvas(&a.canvas, &playfield);
            a.game.set_playfield(playfield);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let App { game, surface, hud, .. } = &mut *a;
            game.frame(surface, time);
            hud.set_fps(fps(game.state().last_delta_ms));
            a.flush_events();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Code Blaster (native) starting...");
    log::info!("Headless mode: run the web build for the interactive game");

    match headless::run(std::env::args().skip(1).collect()) {
        Ok(summary) => {
            println!("{summary}");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session without a display
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use code_blaster::platform::{HudSnapshot, dispatch_events};
    use code_blaster::renderer::CommandBuffer;
    use code_blaster::sim::{GameEvent, Playfield};
    use code_blaster::{Config, Game};

    const DEFAULT_TICKS: u64 = 600;
    /// Ticks between direction changes of the scripted pilot
    const SWEEP_PERIOD: u64 = 90;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Usage: `code-blaster [CONFIG_FILE] [TICKS]`
    pub fn run(args: Vec<String>) -> Result<String, String> {
        let source = match args.first() {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {path}: {e}"))?,
            None => Config::starter().to_source(),
        };
        let ticks = match args.get(1) {
            Some(n) => n.parse::<u64>().map_err(|e| format!("bad tick count {n:?}: {e}"))?,
            None => DEFAULT_TICKS,
        };

        let mut game = Game::new(Playfield::new(800.0, 600.0), 0x00C0_DEB1);
        game.apply_source(&source)
            .map_err(|e| format!("{e} ({})", e.hint()))?;

        let mut hud = HudSnapshot::default();
        let mut surface = CommandBuffer::new();
        game.key_down(" ");

        let mut ran = 0;
        for t in 0..ticks {
            steer(&mut game, t);
            surface.clear();
            game.frame(&mut surface, t as f64 * FRAME_MS);
            ran = t + 1;

            let events = game.drain_events();
            for event in &events {
                match event {
                    GameEvent::HudChanged { score, lives } => {
                        log::info!("tick {ran}: score {score}, lives {lives}");
                    }
                    GameEvent::OverlayShown { message, .. } => log::info!("tick {ran}: {message}"),
                    GameEvent::OverlayHidden => {}
                }
            }
            dispatch_events(&events, &mut hud);
            if game.state().is_game_over() {
                break;
            }
        }

        let state = game.state();
        Ok(format!(
            "ticks: {ran}\nscore: {}\nlives: {}\nenemies on screen: {}\nbullets in flight: {}\noutcome: {}",
            hud.score,
            hud.lives,
            state.world.enemy_count(),
            state.world.bullet_count(),
            hud.overlay.as_deref().unwrap_or("still running"),
        ))
    }

    /// Sweep left and right across the field
    fn steer(game: &mut Game, t: u64) {
        if t % SWEEP_PERIOD != 0 {
            return;
        }
        let (hold, release) = if (t / SWEEP_PERIOD) % 2 == 0 {
            ("ArrowLeft", "ArrowRight")
        } else {
            ("ArrowRight", "ArrowLeft")
        };
        game.key_up(release);
        game.key_down(hold);
    }
}

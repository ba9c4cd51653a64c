//! Stone Drop entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(not(target_arch = "wasm32"))]
use stone_drop::sim::WeightCategory;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use stone_drop::Settings;
    use stone_drop::renderer::{Canvas2d, RenderOptions, StoneRenderer};
    use stone_drop::sim::{SimEvent, SimulationController, WeightCategory};

    const WEIGHT_BUTTONS: [&str; 3] = ["lightBtn", "mediumBtn", "heavyBtn"];

    /// App instance holding all state
    struct App {
        sim: SimulationController,
        renderer: StoneRenderer,
        canvas: Canvas2d,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            self.sim.frame(time);
            for event in self.sim.events() {
                if let SimEvent::PlatformHit { index, response, impact_force } = event {
                    log::debug!("Platform {} {:?} (force {:.2})", index, response, impact_force);
                }
            }
            self.renderer.draw(&self.sim, &mut self.canvas);
        }

        fn select_weight(&mut self, weight: WeightCategory) {
            let now = now_ms();
            self.sim.set_weight(weight, now);
            highlight_weight_button(weight);
            self.renderer.draw(&self.sim, &mut self.canvas);
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Stone Drop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::default();
        let seed = js_sys::Date::now() as u64;
        let sim = match SimulationController::for_canvas(
            canvas.width() as f32,
            canvas.height() as f32,
            WeightCategory::Light,
            settings.sim_config(),
            seed,
        ) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Cannot build scene: {}", e);
                return;
            }
        };
        log::info!("Scene ready with seed: {}", seed);

        let renderer = StoneRenderer::new(
            sim.ball().radius(),
            RenderOptions {
                trails: settings.trails,
                textured_ball: settings.quality.textured_ball(),
            },
        );
        let app = Rc::new(RefCell::new(App {
            sim,
            renderer,
            canvas: Canvas2d::new(&canvas, ctx),
        }));

        {
            let mut a = app.borrow_mut();
            let a = &mut *a;
            a.renderer.draw(&a.sim, &mut a.canvas);
            highlight_weight_button(a.sim.weight());
            a.sim.boot(now_ms());
        }

        setup_buttons(app.clone());
        request_animation_frame(app);
        log::info!("Stone Drop running!");
    }

    fn highlight_weight_button(weight: WeightCategory) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for id in WEIGHT_BUTTONS {
            if let Some(btn) = document.get_element_by_id(id) {
                let _ = btn.class_list().remove_1("active");
            }
        }
        let active_id = format!("{}Btn", weight.as_str());
        match document.get_element_by_id(&active_id) {
            Some(btn) => {
                let _ = btn.class_list().add_1("active");
            }
            None => log::warn!("Missing button #{}", active_id),
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("startBtn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().sim.restart(now_ms());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing button #startBtn");
        }

        for id in WEIGHT_BUTTONS {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            let weight: WeightCategory = match id.trim_end_matches("Btn").parse() {
                Ok(weight) => weight,
                Err(e) => {
                    log::error!("{}", e);
                    continue;
                }
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().select_weight(weight);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stone Drop (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the canvas version");

    let weights = match std::env::args().nth(1) {
        Some(name) => match name.parse::<WeightCategory>() {
            Ok(weight) => vec![weight],
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => WeightCategory::ALL.to_vec(),
    };

    for weight in weights {
        headless_run(weight);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Summary of one headless run
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Serialize)]
struct RunReport {
    weight: WeightCategory,
    ticks: u32,
    ball_pos: [f32; 2],
    ball_vel: [f32; 2],
    platforms_broken: usize,
    floor_impact_ticks: usize,
    peak_particles: usize,
    draw_calls: usize,
}

/// Drop one ball for a few seconds of sim time and report where it ended up
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(weight: WeightCategory) {
    use stone_drop::Settings;
    use stone_drop::renderer::{Recorder, RenderOptions, StoneRenderer};
    use stone_drop::sim::{SimEvent, SimulationController};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;
    const TICKS: u32 = 600;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    let settings = Settings::default();
    let mut sim = match SimulationController::for_canvas(WIDTH, HEIGHT, weight, settings.sim_config(), 42) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    let mut renderer = StoneRenderer::new(sim.ball().radius(), RenderOptions::default());
    let mut canvas = Recorder::new(WIDTH, HEIGHT);

    sim.start();
    let mut floor_impact_ticks = 0;
    let mut peak_particles = 0;
    for i in 0..TICKS {
        sim.frame(i as f64 * FRAME_MS);
        if sim.events().iter().any(|e| matches!(e, SimEvent::FloorImpact { .. })) {
            floor_impact_ticks += 1;
        }
        peak_particles = peak_particles.max(sim.particles().len());
    }

    canvas.clear();
    renderer.draw(&sim, &mut canvas);

    let ball = sim.ball();
    let report = RunReport {
        weight,
        ticks: TICKS,
        ball_pos: ball.pos.to_array(),
        ball_vel: ball.vel.to_array(),
        platforms_broken: sim.platforms().iter().filter(|p| p.broken).count(),
        floor_impact_ticks,
        peak_particles,
        draw_calls: canvas.calls.len(),
    };
    log::info!("{} run finished at y = {:.1}", weight.label(), ball.pos.y);
    match serde_json::to_string(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Cannot encode report: {}", e),
    }
}

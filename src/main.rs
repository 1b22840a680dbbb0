//! Neon Backdrop entry point
//!
//! On the web this mounts the backdrop into `#canvas` and drives the frame
//! loop. Natively it prints a deterministic preview of the animation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_backdrop {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use neon_backdrop::consts::MAX_FRAME_DT;
    use neon_backdrop::renderer::RenderState;
    use neon_backdrop::{Backdrop, BackdropError, BackdropResult, Settings, SurfaceSize, Zone};

    /// Mounted backdrop holding all state
    struct App {
        backdrop: Backdrop,
        settings: Settings,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Cleared on unmount; the frame loop stops at the next callback
        mounted: bool,
        resize_listener: Option<Closure<dyn FnMut(web_sys::Event)>>,
    }

    impl App {
        fn new(backdrop: Backdrop, settings: Settings, canvas: HtmlCanvasElement) -> Self {
            Self {
                backdrop,
                settings,
                render_state: None,
                canvas,
                last_time: 0.0,
                mounted: true,
                resize_listener: None,
            }
        }

        /// Advance timelines by wall-clock time
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let repeats = self.backdrop.advance(dt.clamp(0.0, MAX_FRAME_DT));
            if repeats > 0 {
                log::debug!("{} line(s) started a new cycle", repeats);
            }
        }

        /// Render the current frame; no-op until the GPU is ready
        fn render(&mut self) {
            let vertices = self.backdrop.frame_vertices();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height, world) = measure(&window, &self.canvas);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, world);
            }
            self.backdrop.resize(world);
        }

        /// Move one line to another zone and remember the choice
        fn set_line_zone(&mut self, index: usize, zone: Zone) -> bool {
            if !self.backdrop.set_zone(index, zone) {
                return false;
            }
            if let Some(spec) = self.settings.lines.get_mut(index) {
                spec.zone = zone;
            }
            self.settings.save();
            true
        }

        /// Cancel every timeline and detach from the page
        fn unmount(&mut self) {
            if !self.mounted {
                return;
            }
            self.mounted = false;
            self.backdrop.teardown();

            if let (Some(window), Some(listener)) = (web_sys::window(), self.resize_listener.take())
            {
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    listener.as_ref().unchecked_ref(),
                );
            }
            self.render_state = None;
        }
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// Size the canvas backing store; returns pixel size and world size
    fn measure(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32, SurfaceSize) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (
            width,
            height,
            SurfaceSize::new(client_w as f32, client_h as f32),
        )
    }

    pub async fn run() -> BackdropResult<()> {
        log::info!("Neon Backdrop starting...");

        let window = web_sys::window().ok_or_else(|| BackdropError::mount("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| BackdropError::mount("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| BackdropError::mount("no #canvas element"))?
            .dyn_into()
            .map_err(|_| BackdropError::mount("#canvas is not a canvas"))?;

        let (width, height, world) = measure(&window, &canvas);

        let settings = Settings::load();
        let background = settings.background_color()?;
        let seed = js_sys::Date::now() as u64;
        let backdrop = Backdrop::new(&settings, world, seed)?;

        let app = Rc::new(RefCell::new(App::new(backdrop, settings, canvas.clone())));
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        // Frames render nothing until the GPU is ready
        request_animation_frame(app.clone());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, world, background).await?;

        {
            let mut a = app.borrow_mut();
            if !a.mounted {
                log::info!("Unmounted before the GPU was ready");
                return Ok(());
            }
            a.render_state = Some(render_state);
        }

        setup_resize_handler(app.clone());
        // Catch any resize that happened while the GPU was being set up
        app.borrow_mut().resize();

        log::info!("Neon Backdrop running!");
        Ok(())
    }

    fn setup_resize_handler(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let listener = {
            let app = app.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            })
        };
        let _ = window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
        app.borrow_mut().resize_listener = Some(listener);
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if !a.mounted {
                return;
            }
            a.update(time);
            a.render();
        }

        request_animation_frame(app);
    }

    /// Returns false for an unknown zone name or line index
    pub fn set_line_zone(index: usize, zone: &str) -> bool {
        let zone: Zone = match zone.parse() {
            Ok(zone) => zone,
            Err(e) => {
                log::warn!("{}", e);
                return false;
            }
        };
        APP.with(|slot| {
            slot.borrow()
                .as_ref()
                .is_some_and(|app| app.borrow_mut().set_line_zone(index, zone))
        })
    }

    /// Stop all animation synchronously and release the GPU surface
    pub fn unmount() {
        let app = APP.with(|slot| slot.borrow_mut().take());
        if let Some(app) = app {
            app.borrow_mut().unmount();
            log::info!("Neon Backdrop unmounted");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_backdrop::run().await {
        log::error!("Neon Backdrop failed to mount: {}", e);
    }
}

/// Tear the backdrop down before its canvas is removed from the page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_backdrop::unmount();
}

/// Move a line to the "top", "middle" or "bottom" zone; persisted in settings
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_line_zone(index: usize, zone: &str) -> bool {
    wasm_backdrop::set_line_zone(index, zone)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Backdrop (native) starting...");
    log::info!("Native mode has no surface - run with `trunk serve` for the web version");

    // Optional zone per line, e.g. `neon-backdrop top middle bottom`
    let mut settings = neon_backdrop::Settings::load();
    for (spec, arg) in settings.lines.iter_mut().zip(std::env::args().skip(1)) {
        match arg.parse::<neon_backdrop::Zone>() {
            Ok(zone) => spec.zone = zone,
            Err(e) => log::warn!("Ignoring argument: {}", e),
        }
    }

    match native_preview::preview(&settings, 42) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Preview failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native_preview {
    use serde::Serialize;

    use neon_backdrop::{AnimationState, Backdrop, BackdropResult, LineSpec, Path, Settings, SurfaceSize};

    /// Preview sampling step (seconds)
    const STEP: f32 = 0.5;

    #[derive(Serialize)]
    struct Sample {
        time: f32,
        state: AnimationState,
        generation: u64,
    }

    #[derive(Serialize)]
    struct LinePreview {
        spec: LineSpec,
        path: Path,
        samples: Vec<Sample>,
    }

    /// Simulate until every line has finished its first cycle, as JSON
    pub fn preview(settings: &Settings, seed: u64) -> BackdropResult<String> {
        let mut backdrop = Backdrop::new(settings, SurfaceSize::new(1000.0, 800.0), seed)?;

        let mut previews: Vec<LinePreview> = backdrop
            .lines()
            .iter()
            .map(|line| LinePreview {
                spec: *line.spec(),
                path: line.path().clone(),
                samples: Vec::new(),
            })
            .collect();

        let timing = settings.timing;
        let latest_start = settings.lines.iter().map(|l| l.delay).fold(0.0, f32::max);
        let end = latest_start
            + (timing.draw_duration).max(timing.hold + timing.erase_duration)
            + timing.repeat_delay;
        let steps = (end / STEP).ceil() as usize;

        for step in 0..=steps {
            if step > 0 {
                backdrop.advance(STEP);
            }
            for (preview, line) in previews.iter_mut().zip(backdrop.lines()) {
                preview.samples.push(Sample {
                    time: step as f32 * STEP,
                    state: line.state(),
                    generation: line.generation(),
                });
            }
        }
        backdrop.teardown();

        Ok(serde_json::to_string_pretty(&previews)?)
    }
}

mod utils;

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod field;
pub mod particle;
pub mod pointer;
pub mod renderer;

pub use animation::{FrameLoop, RunLoop};
pub use color::Color;
pub use config::{BoundaryPolicy, FieldConfig, LinkStyle, Repulsion, MAX_PARTICLES};
pub use error::{ConfigError, Error};
pub use field::{line_opacity, Link, ParticleField};
pub use particle::Particle;
pub use pointer::Pointer;
pub use renderer::{CanvasSurface, DisplayList, DrawCommand, Surface};

use events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use utils::Timer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

const CANVAS_ID: &str = "particle-canvas";

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    utils::init_logger(log::Level::Info);
}

/// JSON for one of the built-in configurations ("drifting" or "interactive"),
/// as a starting point for `ParticleBackground` overrides.
#[wasm_bindgen]
pub fn preset_config(name: &str) -> Result<String, JsValue> {
    let config = FieldConfig::preset(name).ok_or_else(|| Error::UnknownPreset(name.to_owned()))?;
    Ok(serde_json::to_string(&config).map_err(Error::from)?)
}

// Everything a frame touches, shared between the frame callback and the
// event handlers
struct Scene {
    field: ParticleField,
    run_loop: RunLoop,
    surface: Option<CanvasSurface>,
    profiling: bool,
}

impl Scene {
    fn tick(&mut self, timestamp: f64) -> bool {
        let _timer = if self.profiling {
            Some(Timer::new("ParticleBackground::frame"))
        } else {
            None
        };
        let Scene {
            field,
            run_loop,
            surface,
            ..
        } = self;
        run_loop.frame(field, surface.as_mut(), timestamp)
    }
}

#[wasm_bindgen]
pub struct ParticleBackground {
    window: Window,
    canvas: HtmlCanvasElement,
    owns_canvas: bool,
    scene: Rc<RefCell<Scene>>,
    frame_loop: Option<FrameLoop>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Creates a fixed, full-viewport canvas behind the page content.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ParticleBackground, JsValue> {
        let config = parse_config(config_json.as_deref())?;
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;
        let body = document.body().ok_or(Error::NoBody)?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::MissingCanvas(CANVAS_ID.to_owned()))?;
        canvas.set_id(CANVAS_ID);
        style_as_background(&canvas)?;
        body.prepend_with_node_1(&canvas)?;

        Ok(ParticleBackground::mount(window, canvas, true, config))
    }

    /// Draws into an existing `<canvas>` instead of creating one.
    pub fn attach(canvas_id: &str, config_json: Option<String>) -> Result<ParticleBackground, JsValue> {
        let config = parse_config(config_json.as_deref())?;
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| Error::MissingCanvas(canvas_id.to_owned()))?;

        Ok(ParticleBackground::mount(window, canvas, false, config))
    }

    /// Subscribes to pointer and resize events and starts requesting frames.
    /// Does nothing if already running.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.frame_loop.is_some() {
            return Ok(());
        }
        let document = self.window.document().ok_or(Error::NoDocument)?;

        let scene = self.scene.clone();
        let on_move = EventListener::new(&document, "mousemove", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                scene
                    .borrow_mut()
                    .field
                    .set_pointer(mouse.client_x() as f64, mouse.client_y() as f64);
            }
        })?;

        // mouseout with no related target means the pointer left the window
        let scene = self.scene.clone();
        let on_leave = EventListener::new(&document, "mouseout", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                if mouse.related_target().is_none() {
                    scene.borrow_mut().field.clear_pointer();
                }
            }
        })?;

        let scene = self.scene.clone();
        let window = self.window.clone();
        let canvas = self.canvas.clone();
        let on_resize = EventListener::new(&self.window, "resize", move |_| {
            let (width, height) = viewport_size(&window);
            resize_scene(&canvas, &mut scene.borrow_mut(), width, height);
        })?;

        self.scene.borrow_mut().run_loop.start();
        let scene = self.scene.clone();
        let scheduled = FrameLoop::schedule(&self.window, move |timestamp| {
            scene.borrow_mut().tick(timestamp)
        });
        let frame_loop = match scheduled {
            Ok(frame_loop) => frame_loop,
            Err(e) => {
                self.scene.borrow_mut().run_loop.stop();
                return Err(e);
            }
        };

        self.listeners = vec![on_move, on_leave, on_resize];
        self.frame_loop = Some(frame_loop);
        log::info!("particle background started");
        Ok(())
    }

    /// Stops animating and unsubscribes from events. The last frame stays
    /// on the canvas.
    pub fn stop(&mut self) {
        self.scene.borrow_mut().run_loop.stop();
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.cancel();
            log::info!("particle background stopped");
        }
        self.listeners.clear();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        resize_scene(&self.canvas, &mut self.scene.borrow_mut(), width, height);
    }

    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.scene.borrow_mut().field.set_pointer(x, y);
    }

    pub fn clear_pointer(&mut self) {
        self.scene.borrow_mut().field.clear_pointer();
    }

    /// Wraps each frame in a console.time span.
    pub fn set_profiling(&mut self, enabled: bool) {
        self.scene.borrow_mut().profiling = enabled;
    }

    pub fn particle_count(&self) -> usize {
        self.scene.borrow().field.particles().len()
    }

    pub fn is_running(&self) -> bool {
        self.scene.borrow().run_loop.is_running()
    }

    pub fn frames(&self) -> u32 {
        self.scene.borrow().run_loop.frames().min(u32::MAX as u64) as u32
    }
}

impl ParticleBackground {
    fn mount(window: Window, canvas: HtmlCanvasElement, owns_canvas: bool, config: FieldConfig) -> Self {
        let (width, height) = viewport_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let surface = context_2d(&canvas).map(CanvasSurface::new);
        if surface.is_none() {
            log::warn!("2D canvas context unavailable, particles will not be drawn");
        }

        let field = ParticleField::new(config, width, height);
        log::info!(
            "particle background mounted: {} particles on {}x{}",
            field.particles().len(),
            width,
            height
        );

        ParticleBackground {
            window,
            canvas,
            owns_canvas,
            scene: Rc::new(RefCell::new(Scene {
                field,
                run_loop: RunLoop::new(),
                surface,
                profiling: false,
            })),
            frame_loop: None,
            listeners: Vec::new(),
        }
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.stop();
        if self.owns_canvas {
            self.canvas.remove();
        }
    }
}

fn parse_config(json: Option<&str>) -> Result<FieldConfig, Error> {
    match json {
        Some(json) => FieldConfig::from_json(json),
        None => Ok(FieldConfig::default()),
    }
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn resize_scene(canvas: &HtmlCanvasElement, scene: &mut Scene, width: f64, height: f64) {
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
    scene.field.resize(width, height);
    log::debug!("surface resized to {}x{}", width, height);
}

fn style_as_background(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let style = canvas.style();
    let properties = [
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("pointer-events", "none"),
        ("z-index", "0"),
    ];
    for (property, value) in properties.iter() {
        style.set_property(property, value)?;
    }
    Ok(())
}

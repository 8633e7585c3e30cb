// Frame driving. `RunLoop` is the part that decides what a frame does and
// whether another one should follow; `FrameLoop` hooks it up to
// requestAnimationFrame in the browser.

use crate::field::ParticleField;
use crate::renderer::Surface;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Frames between frame-rate log lines.
pub const FPS_WINDOW: u64 = 300;

#[derive(Debug, Default)]
pub struct RunLoop {
    running: bool,
    frames: u64,
    window_start: Option<(f64, u64)>,
    last_fps: Option<f64>,
}

impl RunLoop {
    pub fn new() -> Self {
        RunLoop::default()
    }

    pub fn start(&mut self) {
        self.running = true;
        self.window_start = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Most recent frame-rate sample, once a full window has elapsed.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }

    /// Runs one frame: a single step of motion, then a redraw if there is
    /// somewhere to draw. Returns whether the caller should schedule the
    /// next frame. `timestamp` is the host's frame time in milliseconds.
    pub fn frame<S: Surface + ?Sized>(
        &mut self,
        field: &mut ParticleField,
        surface: Option<&mut S>,
        timestamp: f64,
    ) -> bool {
        if !self.running {
            return false;
        }

        field.step(1.0);
        if let Some(surface) = surface {
            field.render(surface);
        }

        self.frames += 1;
        self.sample_frame_rate(timestamp);
        true
    }

    fn sample_frame_rate(&mut self, timestamp: f64) {
        let (start, start_frame) = match self.window_start {
            Some(window) => window,
            None => {
                self.window_start = Some((timestamp, self.frames));
                return;
            }
        };
        let frames = self.frames - start_frame;
        if frames < FPS_WINDOW {
            return;
        }
        let elapsed = timestamp - start;
        if elapsed > 0.0 {
            let fps = frames as f64 * 1000.0 / elapsed;
            log::debug!("{} frames, {:.1} fps", self.frames, fps);
            self.last_fps = Some(fps);
        }
        self.window_start = Some((timestamp, self.frames));
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A requestAnimationFrame chain. Each callback re-registers itself while
/// `tick` returns true. Dropping or cancelling releases the callback.
pub struct FrameLoop {
    window: Window,
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn schedule<F>(window: &Window, mut tick: F) -> Result<FrameLoop, JsValue>
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let next = callback.clone();
        let next_pending = pending.clone();
        let next_window = window.clone();
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            next_pending.set(None);
            if !tick(timestamp) {
                return;
            }
            if let Some(cb) = next.borrow().as_ref() {
                match next_window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next_pending.set(Some(id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        pending.set(Some(id));
        *callback.borrow_mut() = Some(closure);

        Ok(FrameLoop {
            window: window.clone(),
            callback,
            pending,
        })
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        // Breaks the closure's reference to itself
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::particle::Particle;
    use crate::renderer::{DisplayList, DrawCommand};

    fn one_particle_field() -> ParticleField {
        let mut field = ParticleField::empty(FieldConfig::drifting(), 100.0, 100.0);
        field.spawn(Particle::new(10.0, 10.0, 1.0, 0.0, 1.0, 1.0));
        field
    }

    #[test]
    fn stopped_loop_does_nothing() {
        let mut field = one_particle_field();
        let mut list = DisplayList::new();
        let mut run = RunLoop::new();

        assert!(!run.frame(&mut field, Some(&mut list), 0.0));
        assert!(list.commands.is_empty());
        assert_eq!(field.particles()[0].pos, [10.0, 10.0]);
        assert_eq!(run.frames(), 0);
    }

    #[test]
    fn running_loop_steps_and_draws_until_stopped() {
        let mut field = one_particle_field();
        let mut list = DisplayList::new();
        let mut run = RunLoop::new();
        run.start();

        for i in 0..3 {
            assert!(run.frame(&mut field, Some(&mut list), i as f64 * 16.0));
        }
        assert_eq!(run.frames(), 3);
        assert_eq!(field.particles()[0].pos, [13.0, 10.0]);
        let clears = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear { .. }))
            .count();
        assert_eq!(clears, 3);

        run.stop();
        list.reset();
        assert!(!run.frame(&mut field, Some(&mut list), 64.0));
        assert!(list.commands.is_empty());
        assert_eq!(field.particles()[0].pos, [13.0, 10.0]);
    }

    #[test]
    fn missing_surface_still_steps() {
        let mut field = one_particle_field();
        let mut run = RunLoop::new();
        run.start();
        assert!(run.frame::<DisplayList>(&mut field, None, 0.0));
        assert_eq!(field.particles()[0].pos, [11.0, 10.0]);
    }

    #[test]
    fn samples_frame_rate_every_window() {
        let mut field = ParticleField::empty(FieldConfig::drifting(), 10.0, 10.0);
        let mut run = RunLoop::new();
        run.start();
        // first frame opens the window at t = 0
        for i in 0..FPS_WINDOW {
            run.frame::<DisplayList>(&mut field, None, i as f64 * 20.0);
        }
        assert!(run.last_fps().is_none());
        run.frame::<DisplayList>(&mut field, None, FPS_WINDOW as f64 * 20.0);
        assert_eq!(run.frames(), FPS_WINDOW + 1);
        assert_eq!(run.last_fps(), Some(50.0));
    }
}

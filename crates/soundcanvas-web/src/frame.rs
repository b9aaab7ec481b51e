use crate::audio::AnalyserSource;
use crate::surface::CanvasSurface;
use instant::Instant;
use soundcanvas_core::{TickOutcome, Visualizer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub visualizer: Rc<RefCell<Visualizer>>,
    pub surface: CanvasSurface,
    pub source: AnalyserSource,
    pub started: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = self.started.elapsed().as_secs_f64();
        let mut vis = self.visualizer.borrow_mut();
        match vis.tick(&mut self.surface, &mut self.source, now) {
            Ok(TickOutcome::Rendered { .. }) | Ok(TickOutcome::Paused) => {}
            Err(e) => {
                log::error!("[driver] {}; pausing", e);
                vis.pause();
            }
        }
    }

    fn should_reschedule(&self) -> bool {
        self.visualizer.borrow().should_reschedule()
    }
}

/// requestAnimationFrame loop that stops re-arming once the visualizer pauses.
///
/// The frame closure holds a clone of the loop so it can re-arm itself; that
/// cycle lives until [`FrameLoop::stop`].
#[derive(Clone)]
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn new(frame_ctx: FrameContext) -> Self {
        let frame_ctx = Rc::new(RefCell::new(frame_ctx));
        let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let this = Self {
            tick: tick.clone(),
            pending: pending.clone(),
        };
        let rearm = this.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pending.set(None);
            let mut ctx = frame_ctx.borrow_mut();
            ctx.frame();
            if ctx.should_reschedule() {
                rearm.request();
            }
        }) as Box<dyn FnMut()>));
        this
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Request the next frame unless one is already queued.
    pub fn request(&self) {
        if self.is_pending() {
            return;
        }
        let Some(w) = web::window() else {
            return;
        };
        let tick = self.tick.borrow();
        let Some(closure) = tick.as_ref() else {
            return;
        };
        match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => self.pending.set(Some(handle)),
            Err(e) => log::error!("[driver] requestAnimationFrame failed: {:?}", e),
        }
    }

    /// Cancel any queued frame and drop the frame closure.
    ///
    /// Must not be called from inside the frame callback.
    pub fn stop(&self) {
        if let Some(handle) = self.pending.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(handle);
            }
        }
        drop(self.tick.borrow_mut().take());
    }
}

#![cfg(target_arch = "wasm32")]
//! Browser front-end: a 2D canvas, a WebAudio analyser and a RAF loop around
//! the soundcanvas core.

mod audio;
mod dom;
mod frame;
mod surface;

use instant::Instant;
use soundcanvas_core::{Visualizer, VisualizerConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const DEFAULT_CANVAS_ID: &str = "visualizer";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("soundcanvas-web starting");

    match dom::canvas_by_id(DEFAULT_CANVAS_ID) {
        Ok(canvas) => {
            let bounds = dom::sync_canvas_backing_size(&canvas);
            log::info!(
                "[canvas] #{} {:.0}x{:.0}",
                DEFAULT_CANVAS_ID,
                bounds.width,
                bounds.height
            );
        }
        Err(e) => log::info!("[canvas] {}; waiting for SoundCanvas::new", e),
    }
    Ok(())
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// JS handle over one visualizer session.
#[wasm_bindgen]
pub struct SoundCanvas {
    visualizer: Rc<RefCell<Visualizer>>,
    canvas: web::HtmlCanvasElement,
    audio_ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    frames: frame::FrameLoop,
    _resize: Option<dom::ResizeListener>,
}

#[wasm_bindgen]
impl SoundCanvas {
    /// Attach to the canvas with `canvas_id` and build the audio graph.
    ///
    /// The session starts paused; call `resume()` from a user gesture.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<SoundCanvas, JsValue> {
        Self::init(canvas_id, VisualizerConfig::default()).map_err(|e| {
            log::error!("init error: {:?}", e);
            to_js(e)
        })
    }

    fn init(canvas_id: &str, config: VisualizerConfig) -> anyhow::Result<SoundCanvas> {
        let canvas = dom::canvas_by_id(canvas_id)?;
        let bounds = dom::sync_canvas_backing_size(&canvas);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext error: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let audio_ctx =
            web::AudioContext::new().map_err(|e| anyhow::anyhow!("AudioContext error: {:?}", e))?;
        let analyser = audio::create_analyser(&audio_ctx, &config)?;

        let visualizer = Rc::new(RefCell::new(Visualizer::new(config, bounds)?));
        let frames = frame::FrameLoop::new(frame::FrameContext {
            visualizer: visualizer.clone(),
            surface: surface::CanvasSurface::new(canvas.clone(), ctx),
            source: audio::AnalyserSource::new(analyser.clone()),
            started: Instant::now(),
        });

        let resize = {
            let canvas = canvas.clone();
            let visualizer = visualizer.clone();
            dom::ResizeListener::new(move || {
                let bounds = dom::sync_canvas_backing_size(&canvas);
                visualizer.borrow_mut().on_resize(bounds);
            })
        };

        Ok(SoundCanvas {
            visualizer,
            canvas,
            audio_ctx,
            analyser,
            frames,
            _resize: resize,
        })
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, name: &str) -> Result<(), JsValue> {
        self.visualizer
            .borrow_mut()
            .set_mode_by_name(name)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = setColorScheme)]
    pub fn set_color_scheme(&self, name: &str) -> Result<(), JsValue> {
        self.visualizer
            .borrow_mut()
            .set_color_scheme(name)
            .map_err(to_js)
    }

    /// Re-read the canvas CSS size; the page calls this after layout changes.
    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self) {
        let bounds = dom::sync_canvas_backing_size(&self.canvas);
        self.visualizer.borrow_mut().on_resize(bounds);
    }

    #[wasm_bindgen(js_name = reinitializeParticles)]
    pub fn reinitialize_particles(&self, count: usize) {
        self.visualizer.borrow_mut().reinitialize_particles(count);
    }

    pub fn pause(&self) {
        self.visualizer.borrow_mut().pause();
    }

    pub fn resume(&self) {
        match self.audio_ctx.resume() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[audio] resume rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] resume error: {:?}", e),
        }
        self.visualizer.borrow_mut().resume();
        if !self.frames.is_pending() {
            self.frames.request();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.visualizer.borrow().mode().to_string()
    }

    #[wasm_bindgen(getter, js_name = colorScheme)]
    pub fn color_scheme(&self) -> String {
        self.visualizer.borrow().colors().current().name.to_string()
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.visualizer.borrow().is_running()
    }

    /// Node the page connects its media source into.
    #[wasm_bindgen(getter)]
    pub fn analyser(&self) -> web::AnalyserNode {
        self.analyser.clone()
    }

    #[wasm_bindgen(getter, js_name = audioContext)]
    pub fn audio_context(&self) -> web::AudioContext {
        self.audio_ctx.clone()
    }
}

impl Drop for SoundCanvas {
    fn drop(&mut self) {
        self.visualizer.borrow_mut().pause();
        self.frames.stop();
        let _ = self.audio_ctx.close();
        log::info!("[driver] session closed");
    }
}

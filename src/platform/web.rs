//! Browser host: canvas by id, window resize events, requestAnimationFrame

use anyhow::Context;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::{Host, ResizeHandler, Viewport};
use crate::renderer::{Canvas2dSurface, GpuSurface, Surface};
use crate::scheduler::{FrameCallback, FrameSource};
use crate::settings::RenderBackend;

/// Fixed, full-viewport, behind content, never a pointer target
const LAYER_STYLE: &str =
    "position: fixed; inset: 0; width: 100vw; height: 100vh; z-index: 0; pointer-events: none;";

fn viewport_of(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// `requestAnimationFrame` / `cancelAnimationFrame`
#[derive(Clone)]
pub struct AnimationFrames {
    window: Window,
}

/// A requested animation frame. Owns the JS callback, so dropping the
/// handle (after the frame ran, or on cancel) frees it.
pub struct AnimationFrame {
    id: i32,
    _callback: Closure<dyn FnMut(f64)>,
}

impl FrameSource for AnimationFrames {
    type Handle = AnimationFrame;

    fn request_frame(&self, callback: FrameCallback) -> Option<AnimationFrame> {
        let closure: Closure<dyn FnMut(f64)> = Closure::once(move |time: f64| callback(time));
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => Some(AnimationFrame {
                id,
                _callback: closure,
            }),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&self, frame: AnimationFrame) {
        let _ = self.window.cancel_animation_frame(frame.id);
    }
}

/// Window `resize` listener, removed on drop
pub struct ResizeListener {
    window: Window,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref());
    }
}

pub struct WebHost {
    window: Window,
    canvas: Option<HtmlCanvasElement>,
    backend: RenderBackend,
    gpu: Option<GpuSurface>,
}

impl WebHost {
    /// Look up the layer canvas. A missing canvas is not an error; the host
    /// just has no surface to hand out.
    pub fn new(canvas_id: &str, backend: RenderBackend) -> anyhow::Result<Self> {
        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

        match &canvas {
            Some(canvas) => {
                let _ = canvas.set_attribute("style", LAYER_STYLE);
                let viewport = viewport_of(&window);
                canvas.set_width(viewport.width);
                canvas.set_height(viewport.height);
            }
            None => log::debug!("No <canvas id=\"{}\"> on the page", canvas_id),
        }

        Ok(Self {
            window,
            canvas,
            backend,
            gpu: None,
        })
    }

    /// Set up the WebGPU surface ahead of mount when that backend is chosen
    pub async fn prepare_gpu(&mut self) {
        if self.backend != RenderBackend::WebGpu {
            return;
        }
        let Some(canvas) = self.canvas.clone() else {
            return;
        };
        match GpuSurface::from_canvas(canvas).await {
            Ok(surface) => self.gpu = Some(surface),
            Err(e) => log::warn!("WebGPU unavailable ({e:#}), falling back to Canvas2D"),
        }
    }
}

impl Host for WebHost {
    type Surface = Box<dyn Surface>;
    type Frames = AnimationFrames;
    type Subscription = ResizeListener;

    fn acquire_surface(&mut self) -> Option<Box<dyn Surface>> {
        if let Some(gpu) = self.gpu.take() {
            log::info!("Rendering with {}", RenderBackend::WebGpu.as_str());
            return Some(Box::new(gpu));
        }
        let surface = Canvas2dSurface::from_canvas(self.canvas.clone()?)?;
        log::info!("Rendering with {}", RenderBackend::Canvas2d.as_str());
        Some(Box::new(surface))
    }

    fn viewport(&self) -> Viewport {
        viewport_of(&self.window)
    }

    fn frame_source(&self) -> AnimationFrames {
        AnimationFrames {
            window: self.window.clone(),
        }
    }

    fn subscribe_resize(&self, mut handler: ResizeHandler) -> ResizeListener {
        let window = self.window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            handler(viewport_of(&window));
        });
        let _ = self
            .window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        ResizeListener {
            window: self.window.clone(),
            closure,
        }
    }
}

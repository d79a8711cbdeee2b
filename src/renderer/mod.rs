//! Rendering module
//!
//! The proximity renderer draws against the `Surface` trait; backends are
//! Canvas2D (browser default), WebGPU (tessellated triangle list) and an
//! in-memory recorder used headless.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod color;
pub mod gpu;
pub mod proximity;
pub mod recording;

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2dSurface;
pub use color::Rgba;
pub use gpu::GpuSurface;
pub use proximity::{Link, ProximityRenderer, link_alpha};
pub use recording::{DrawCommand, FrameLog, RecordingSurface};

/// A 2D drawing target in pixel coordinates (origin top-left, y down)
pub trait Surface {
    /// Match the backing store to new viewport dimensions
    fn resize(&mut self, width: u32, height: u32);

    /// Erase the region `[0,width] x [0,height]`
    fn clear(&mut self, width: f32, height: f32);

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Flush the frame. Immediate-mode surfaces have nothing to do.
    fn present(&mut self) {}
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn clear(&mut self, width: f32, height: f32) {
        (**self).clear(width, height);
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        (**self).fill_disc(center, radius, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        (**self).stroke_line(from, to, width, color);
    }

    fn present(&mut self) {
        (**self).present();
    }
}

//! WebGPU backend
//!
//! Draw calls are tessellated on the CPU into one triangle list per frame
//! and submitted in `present()`.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use super::Surface;
use super::color::Rgba;
pub use pipeline::{FieldPipeline, pixel_to_ndc};
pub use vertex::Vertex;

/// CPU-side vertex accumulator for one frame
#[derive(Debug, Clone, Default)]
pub struct TriangleBatch {
    pub vertices: Vec<Vertex>,
}

impl TriangleBatch {
    pub fn triangles(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl Surface for TriangleBatch {
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn clear(&mut self, _width: f32, _height: f32) {
        self.vertices.clear();
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let segments = shapes::disc_segments(radius);
        self.vertices
            .extend(shapes::circle(center, radius, color.to_f32(), segments));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.vertices
            .extend(shapes::line(from, to, width, color.to_f32()));
    }
}

/// GPU-backed surface
pub struct GpuSurface {
    pipeline: FieldPipeline,
    batch: TriangleBatch,
}

impl GpuSurface {
    pub fn new(pipeline: FieldPipeline) -> Self {
        Self {
            pipeline,
            batch: TriangleBatch::default(),
        }
    }

    /// Set up WebGPU on a canvas. Fails when the browser has no adapter.
    #[cfg(target_arch = "wasm32")]
    pub async fn from_canvas(canvas: web_sys::HtmlCanvasElement) -> anyhow::Result<Self> {
        use anyhow::anyhow;

        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| anyhow!("creating canvas surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("requesting adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let pipeline = FieldPipeline::new(surface, &adapter, width, height).await?;
        Ok(Self::new(pipeline))
    }
}

impl Surface for GpuSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.pipeline.resize(width, height);
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.batch.clear(width, height);
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.batch.fill_disc(center, radius, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.batch.stroke_line(from, to, width, color);
    }

    fn present(&mut self) {
        match self.pipeline.render(&self.batch.vertices) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = self.pipeline.size;
                self.pipeline.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ProximityRenderer;
    use crate::sim::{Particle, SurfaceState};

    #[test]
    fn test_batch_tessellates_a_frame() {
        let renderer = ProximityRenderer::default();
        let particles = [
            Particle::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0),
            Particle::new(Vec2::new(60.0, 10.0), Vec2::ZERO, 2.0),
        ];
        let mut batch = TriangleBatch::default();
        let drawn = renderer.render(&mut batch, &particles, &SurfaceState::new(100.0, 100.0));

        assert_eq!(drawn, 1);
        let disc_tris = 2 * shapes::disc_segments(2.0) as usize;
        assert_eq!(batch.triangles(), disc_tris + 2);
    }

    #[test]
    fn test_clear_resets_batch() {
        let mut batch = TriangleBatch::default();
        batch.fill_disc(Vec2::ZERO, 1.0, Rgba::new(1, 1, 1, 1.0));
        batch.clear(1.0, 1.0);
        assert!(batch.vertices.is_empty());
    }
}

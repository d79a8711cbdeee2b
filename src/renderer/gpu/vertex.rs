//! Vertex format of the field's triangle list
//!
//! Shapes are tessellated in pixel space (origin top-left, y down) with
//! colours already premultiplied by `Rgba::to_f32`. Positions are moved into
//! clip space only at upload time, so a resize never invalidates a batch.

use bytemuck::{Pod, Zeroable};

use super::pipeline::pixel_to_ndc;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Same vertex with its position mapped from pixels to NDC for a target
    /// of `size`
    pub fn to_ndc(self, size: (u32, u32)) -> Self {
        Self {
            position: pixel_to_ndc(size, self.position[0], self.position[1]),
            ..self
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

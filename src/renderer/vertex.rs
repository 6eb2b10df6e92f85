//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Fragment shading mode (stored as f32 so the vertex stays one format family)
pub mod mode {
    /// Sample the bound sprite sheet
    pub const TEXTURED: f32 = 0.0;
    /// Filled circle: `uv` spans -1..1 across the quad, color only
    pub const CIRCLE: f32 = 1.0;
}

/// 2D vertex with position (NDC), texture coords, tint color and shading mode
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub mode: f32,
}

impl Vertex {
    pub const fn new(position: [f32; 2], uv: [f32; 2], color: [f32; 4], mode: f32) -> Self {
        Self {
            position,
            uv,
            color,
            mode,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

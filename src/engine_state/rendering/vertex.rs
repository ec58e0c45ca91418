//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format used for rendering chunk meshes and provides
//! the matching `wgpu` buffer layout for the rendering pipeline.

use cgmath::Vector3;

/// Number of `f32` values per vertex: position (3) + normal (3) + uv (2).
pub const VERTEX_STRIDE_FLOATS: usize = 8;

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes), chunk local
/// - Normal: [f32; 3] (12 bytes), one of the six axis-aligned unit vectors
/// - Texture Coordinates: [f32; 2] (8 bytes), in 0.0-1.0
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the chunk origin
    pub position: [f32; 3],
    /// Outward face normal
    pub normal: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>, u: f32, v: f32) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords: [u, v],
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

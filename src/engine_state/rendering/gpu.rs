//! # GPU Interface Module
//!
//! The narrow capabilities the voxel core needs from a rendering backend.
//!
//! * [`GpuAllocator`] creates vertex/index buffer pairs from raw mesh data and
//!   releases them again when a chunk is evicted.
//! * [`RenderHandle`] binds the active pipeline, sets named transform uniforms and
//!   issues indexed triangle-list draws over those buffers.
//!
//! Both are implemented for `wgpu` in [`super::wgpu_backend`]; tests provide
//! accounting doubles. Implementations must only be used on the thread that owns
//! the rendering context.

use cgmath::Matrix4;
use thiserror::Error;

/// Name of the per-chunk world transform uniform.
pub const MODEL_UNIFORM: &str = "model";

/// Errors reported by a [`GpuAllocator`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GpuError {
    /// The allocation does not fit in the remaining GPU memory budget.
    #[error("GPU resources exhausted: requested {requested} bytes, {available} bytes available")]
    ResourceExhausted {
        /// Bytes needed for the vertex and index buffers together.
        requested: u64,
        /// Bytes still available to the allocator.
        available: u64,
    },
    /// The backend rejected the allocation for another reason.
    #[error("GPU backend error: {0}")]
    Backend(String),
}

/// Errors reported by a [`RenderHandle`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The bound pipeline has no uniform with this name.
    #[error("unknown uniform `{0}`")]
    UnknownUniform(String),
}

/// Creates and releases the GPU buffers that hold chunk meshes.
pub trait GpuAllocator {
    /// Handle to one vertex + index buffer pair.
    type Buffers;

    /// Uploads interleaved vertex floats (stride `VERTEX_STRIDE_FLOATS`: 3 position,
    /// 3 normal, 2 uv) and triangle-list indices into new buffers.
    ///
    /// Empty meshes are legal and must not fail for that reason alone.
    fn create_buffers(&mut self, vertices: &[f32], indices: &[u32])
        -> Result<Self::Buffers, GpuError>;

    /// Releases buffers created by this allocator. Takes ownership, so each pair can be
    /// released at most once.
    fn release(&mut self, buffers: Self::Buffers);
}

/// The active rendering context as seen by the world renderer.
pub trait RenderHandle {
    /// Buffer handle type this context can draw from.
    type Buffers;

    /// Makes this handle's pipeline the active one.
    fn bind(&mut self);

    /// Sets a named 4x4 transform uniform for subsequent draws.
    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) -> Result<(), RenderError>;

    /// Draws `index_count` indices from `buffers` as a triangle list.
    fn draw_indexed(&mut self, buffers: &Self::Buffers, index_count: u32);
}

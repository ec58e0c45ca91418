//! # Rendering Module
//!
//! Everything between a chunk's block grid and the GPU: the vertex format, the
//! face-culling mesher, the capability traits the world renders through, and the
//! `wgpu` implementation of those traits.
//!
//! The world only needs a [`gpu::RenderHandle`] to draw and a [`gpu::GpuAllocator`] to
//! upload. [`chunk_renderer::ChunkRenderer`] is one owner of a rendering context: it
//! draws a world into an offscreen target, which is how the headless driver renders.

pub mod camera;
pub mod chunk_renderer;
pub mod gpu;
pub mod meshing;
pub mod texture;
pub mod vertex;
pub mod wgpu_backend;

pub use vertex::Vertex;

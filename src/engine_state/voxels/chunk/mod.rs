//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one width x height x width volume of the
//! world together with the surface mesh built from it and the GPU buffers holding
//! that mesh.
//!
//! ## Lifecycle
//!
//! 1. A block grid is produced by a `ChunkGenerator` (or supplied from outside)
//! 2. The face-culled mesh is built from the grid
//! 3. The mesh is uploaded through a `GpuAllocator`
//! 4. The chunk is drawn every frame until the world evicts it
//! 5. On eviction the chunk is consumed and its buffers handed back for release
//!
//! Blocks cannot be edited after construction, so the mesh and the buffers always
//! describe the current grid.

use cgmath::Vector3;

use crate::engine_state::rendering::{
    gpu::{GpuAllocator, GpuError, RenderHandle},
    meshing::{build_mesh, Mesh},
};

pub mod block_grid;
pub mod chunk_coord;
pub mod solid_mask;

use block_grid::BlockGrid;
use chunk_coord::ChunkCoord;

/// A loaded chunk of the voxel world.
///
/// `B` is the buffer handle type of the allocator that uploaded the mesh.
pub struct Chunk<B> {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    position: ChunkCoord,
    /// World-space position of the chunk's minimum corner.
    origin: Vector3<f32>,
    blocks: BlockGrid,
    mesh: Mesh,
    buffers: B,
}

impl<B> Chunk<B> {
    /// Meshes `blocks` and uploads the result through `allocator`.
    ///
    /// # Errors
    /// Returns the allocator's error if the upload fails; nothing is left allocated.
    pub fn new<A>(position: ChunkCoord, blocks: BlockGrid, allocator: &mut A) -> Result<Self, GpuError>
    where
        A: GpuAllocator<Buffers = B>,
    {
        let mesh = build_mesh(&blocks);
        Self::from_mesh(position, blocks, mesh, allocator)
    }

    /// Uploads an already built mesh of `blocks`.
    ///
    /// Used when meshing happened on a worker thread and only the upload is left for the
    /// thread owning the rendering context.
    pub fn from_mesh<A>(
        position: ChunkCoord,
        blocks: BlockGrid,
        mesh: Mesh,
        allocator: &mut A,
    ) -> Result<Self, GpuError>
    where
        A: GpuAllocator<Buffers = B>,
    {
        let buffers = allocator.create_buffers(mesh.vertex_floats(), &mesh.indices)?;
        let origin = position.origin(blocks.width() as u32, blocks.height() as u32);

        Ok(Chunk {
            position,
            origin,
            blocks,
            mesh,
            buffers,
        })
    }

    /// The position of this chunk in chunk coordinates.
    pub fn position(&self) -> ChunkCoord {
        self.position
    }

    /// World-space origin the chunk-local mesh is translated by.
    pub fn origin(&self) -> Vector3<f32> {
        self.origin
    }

    /// The chunk's block grid.
    pub fn blocks(&self) -> &BlockGrid {
        &self.blocks
    }

    /// The chunk's surface mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The GPU buffers holding the mesh.
    pub fn buffers(&self) -> &B {
        &self.buffers
    }

    /// Draws the chunk's buffers through `handle`. Chunks without visible faces draw nothing.
    pub fn render<R>(&self, handle: &mut R)
    where
        R: RenderHandle<Buffers = B>,
    {
        if self.mesh.is_empty() {
            return;
        }
        handle.draw_indexed(&self.buffers, self.mesh.indices.len() as u32);
    }

    /// Consumes the chunk, handing its buffers back to `allocator`.
    pub fn release<A>(self, allocator: &mut A)
    where
        A: GpuAllocator<Buffers = B>,
    {
        allocator.release(self.buffers);
    }
}

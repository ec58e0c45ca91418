//! # Chunk Build Task
//!
//! This module defines the `ChunkBuildTask` which generates the block grid of one
//! chunk and builds its surface mesh on a worker thread. The GPU upload is not part
//! of the task; the world performs it when it drains the result on its own thread.

use std::{sync::Arc, time::Duration};

use log::trace;
use web_time::Instant;

use crate::engine_state::{
    rendering::meshing::{build_mesh, Mesh},
    task_management::task::Task,
    voxels::{
        chunk::{block_grid::BlockGrid, chunk_coord::ChunkCoord},
        terrain::ChunkGenerator,
    },
};

/// A task that builds the CPU side of a chunk asynchronously.
///
/// This task is responsible for:
/// 1. Generating the block grid at the specified position
/// 2. Building the face-culled mesh of that grid
/// 3. Reporting how long both steps took
pub struct ChunkBuildTask {
    /// The position of the chunk to build (in chunk coordinates)
    position: ChunkCoord,
    /// Shared generator, also used by the world for inline builds
    generator: Arc<dyn ChunkGenerator>,
    width: usize,
    height: usize,
}

impl ChunkBuildTask {
    /// Creates a new chunk build task.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the chunk to build
    /// * `generator` - The generator filling the block grid
    /// * `width` - Chunk extent along x and z, in blocks
    /// * `height` - Chunk extent along y, in blocks
    pub fn new(
        position: ChunkCoord,
        generator: Arc<dyn ChunkGenerator>,
        width: usize,
        height: usize,
    ) -> Self {
        ChunkBuildTask {
            position,
            generator,
            width,
            height,
        }
    }

    /// The position this task builds.
    pub fn position(&self) -> ChunkCoord {
        self.position
    }
}

impl Task for ChunkBuildTask {
    type Output = ChunkBuildResult;

    fn process(self) -> ChunkBuildResult {
        build_chunk(self.generator.as_ref(), self.position, self.width, self.height)
    }
}

/// The CPU side of a chunk, ready to be uploaded.
pub struct ChunkBuildResult {
    /// The position of the built chunk
    pub position: ChunkCoord,
    /// The generated block grid
    pub blocks: BlockGrid,
    /// The surface mesh of `blocks`
    pub mesh: Mesh,
    /// Time spent generating and meshing
    pub elapsed: Duration,
}

/// Generates and meshes the chunk at `position`. Shared by background tasks and
/// inline streaming.
pub fn build_chunk(
    generator: &dyn ChunkGenerator,
    position: ChunkCoord,
    width: usize,
    height: usize,
) -> ChunkBuildResult {
    let start = Instant::now();
    let blocks = generator.generate(position, width, height);
    let mesh = build_mesh(&blocks);
    let elapsed = start.elapsed();

    trace!(
        "Built chunk {} in {:?} ({} solid blocks, {} quads)",
        position,
        elapsed,
        blocks.solid_count(),
        mesh.quad_count()
    );

    ChunkBuildResult {
        position,
        blocks,
        mesh,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{block::block_type::BlockType, terrain::FilledGenerator};

    #[test]
    fn builds_grid_and_mesh_for_its_position() {
        let generator: Arc<dyn ChunkGenerator> = Arc::new(FilledGenerator(BlockType::STONE));
        let task = ChunkBuildTask::new(ChunkCoord::new(-2, 0, 5), generator, 2, 3);
        assert_eq!(task.position(), ChunkCoord::new(-2, 0, 5));

        let result = task.process();
        assert_eq!(result.position, ChunkCoord::new(-2, 0, 5));
        assert_eq!(result.blocks.solid_count(), 12);
        // 2x3x2 box: two 2x2 caps and four 2x3 walls
        assert_eq!(result.mesh.quad_count(), 2 * 4 + 4 * 6);
    }
}

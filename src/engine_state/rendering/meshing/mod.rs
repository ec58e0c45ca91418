//! Mesh generation for voxel rendering.
//!
//! Converts a chunk's block grid into a renderable surface by emitting one quad for
//! every exposed face of every solid voxel. A face is exposed when the neighbouring
//! voxel across it is air or lies outside the chunk.
//!
//! # Architecture
//! - [`Mesh`]: vertex and index lists for a chunk
//! - [`build_mesh`]: the face-culling mesher
//!
//! Faces are never merged: two adjacent exposed faces of the same block type still
//! produce two quads.

mod mesh;

pub use mesh::Mesh;

use crate::engine_state::voxels::{
    block::block_side::BlockSide,
    chunk::{block_grid::BlockGrid, solid_mask::SolidMask},
};

/// Builds the face-culled surface mesh of `grid`.
///
/// Positions are chunk local: the voxel at (x, y, z) spans (x..x+1, y..y+1, z..z+1).
/// An all-air grid yields an empty mesh.
pub fn build_mesh(grid: &BlockGrid) -> Mesh {
    let mask = SolidMask::new(grid);
    let mut mesh = Mesh::new();

    for ((x, y, z), block) in grid.iter() {
        if !block.is_solid() {
            continue;
        }

        let (i, j, k) = (x as i32, y as i32, z as i32);
        let exposed = BlockSide::all().map(|side| {
            let [dx, dy, dz] = side.offset();
            !mask.is_solid(i + dx, j + dy, k + dz)
        });

        // Fully enclosed voxel
        if !exposed.contains(&true) {
            continue;
        }

        for (side, visible) in BlockSide::all().into_iter().zip(exposed) {
            if visible {
                mesh.add_face(x, y, z, side);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn isolated_voxel_has_six_faces() {
        let grid = BlockGrid::from_fn(3, 3, |x, y, z| {
            if (x, y, z) == (1, 1, 1) {
                BlockType::GRASS
            } else {
                BlockType::AIR
            }
        });
        let mesh = build_mesh(&grid);
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn touching_voxels_hide_shared_faces() {
        let grid = BlockGrid::from_fn(4, 1, |x, _, z| {
            if z == 0 && x < 2 {
                BlockType::DIRT
            } else {
                BlockType::AIR
            }
        });
        // Two cubes side by side: 12 faces minus the two that touch.
        assert_eq!(build_mesh(&grid).quad_count(), 10);
    }

    #[test]
    fn air_grid_builds_empty_mesh() {
        let mesh = build_mesh(&BlockGrid::filled(16, 64, BlockType::AIR));
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn indices_reference_their_own_quad() {
        let mesh = build_mesh(&BlockGrid::filled(2, 2, BlockType::STONE));
        for (quad, indices) in mesh.indices.chunks(6).enumerate() {
            let base = quad as u32 * 4;
            assert!(indices.iter().all(|i| (base..base + 4).contains(i)));
        }
    }
}

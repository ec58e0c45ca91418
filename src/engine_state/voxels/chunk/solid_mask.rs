//! # Solid Mask Module
//!
//! A bit-per-voxel solidity map of a block grid, padded with one layer of
//! permanently empty voxels on every side.
//!
//! The padding lets neighbour lookups during meshing step one voxel past the
//! grid edge without bounds checks: a voxel at the edge of the chunk sees air
//! beyond it, which is exactly the "out of bounds means exposed" rule.

use bitvec::prelude::BitVec;

use super::block_grid::BlockGrid;

/// Padded solidity bitmap for a single chunk.
pub struct SolidMask {
    /// Padded extent along x and z (`width + 2`).
    wrapped_width: usize,
    /// Padded extent along y (`height + 2`).
    wrapped_height: usize,
    bits: BitVec,
}

impl SolidMask {
    /// Builds the mask for `grid`.
    pub fn new(grid: &BlockGrid) -> Self {
        let wrapped_width = grid.width() + 2;
        let wrapped_height = grid.height() + 2;
        let mut bits = BitVec::repeat(false, wrapped_width * wrapped_height * wrapped_width);

        for ((x, y, z), block) in grid.iter() {
            if block.is_solid() {
                let index = x + 1 + wrapped_width * (z + 1 + wrapped_width * (y + 1));
                bits.set(index, true);
            }
        }

        SolidMask {
            wrapped_width,
            wrapped_height,
            bits,
        }
    }

    /// Solidity of the voxel at chunk-local (x, y, z), where every component may be one
    /// step outside the grid (-1 or the grid extent).
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        let (i, j, k) = ((x + 1) as usize, (y + 1) as usize, (z + 1) as usize);
        debug_assert!(i < self.wrapped_width && k < self.wrapped_width && j < self.wrapped_height);
        self.bits[i + self.wrapped_width * (k + self.wrapped_width * j)]
    }
}

//! # Block Grid Module
//!
//! Dense storage for the blocks of one chunk volume. Every voxel stores its
//! `BlockType` (one byte each), laid out y-major: `x + width * (z + width * y)`.
//!
//! Grids are either produced by a `ChunkGenerator` or supplied from outside as a
//! flat array of raw block ids in the same layout.

use thiserror::Error;

use crate::engine_state::voxels::block::{block_type::BlockType, BlockTypeSize};

/// Errors produced when decoding an externally supplied block grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The id array does not contain exactly width * height * width entries.
    #[error("block grid expected {expected} ids but got {actual}")]
    LengthMismatch {
        /// Number of ids required by the grid dimensions.
        expected: usize,
        /// Number of ids actually supplied.
        actual: usize,
    },
    /// An id does not name any known block type.
    #[error("unknown block id {0}")]
    UnknownBlockId(BlockTypeSize),
}

/// A dense width x height x width grid of block types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    width: usize,
    height: usize,
    blocks: Vec<BlockType>,
}

impl BlockGrid {
    /// Creates a grid where every voxel has the same type.
    pub fn filled(width: usize, height: usize, block_type: BlockType) -> Self {
        BlockGrid {
            width,
            height,
            blocks: vec![block_type; width * height * width],
        }
    }

    /// Creates a grid by evaluating `f(x, y, z)` for every voxel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize, usize) -> BlockType,
    ) -> Self {
        let mut blocks = Vec::with_capacity(width * height * width);
        for y in 0..height {
            for z in 0..width {
                for x in 0..width {
                    blocks.push(f(x, y, z));
                }
            }
        }
        BlockGrid {
            width,
            height,
            blocks,
        }
    }

    /// Decodes a flat array of raw block ids laid out as `x + width * (z + width * y)`.
    pub fn from_ids(width: usize, height: usize, ids: &[BlockTypeSize]) -> Result<Self, GridError> {
        let expected = width * height * width;
        if ids.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: ids.len(),
            });
        }

        let blocks = ids
            .iter()
            .map(|&id| BlockType::from_id(id).ok_or(GridError::UnknownBlockId(id)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BlockGrid {
            width,
            height,
            blocks,
        })
    }

    /// Extent of the grid along x and z.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Extent of the grid along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether (x, y, z) lies inside the grid.
    #[inline]
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.width && y < self.height && z < self.width
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.width * (z + self.width * y)
    }

    /// The block at (x, y, z), or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<BlockType> {
        self.contains(x, y, z)
            .then(|| self.blocks[self.index(x, y, z)])
    }

    /// Whether the voxel at (x, y, z) is solid. Out-of-bounds voxels are never solid.
    pub fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z).is_some_and(BlockType::is_solid)
    }

    /// Number of solid voxels in the grid.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_solid()).count()
    }

    /// Iterates every voxel as `((x, y, z), block_type)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), BlockType)> + '_ {
        let width = self.width;
        self.blocks.iter().enumerate().map(move |(i, &block)| {
            let x = i % width;
            let z = (i / width) % width;
            let y = i / (width * width);
            ((x, y, z), block)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_places_blocks_at_their_coordinates() {
        let grid = BlockGrid::from_fn(4, 3, |x, y, z| {
            if (x, y, z) == (1, 2, 3) {
                BlockType::STONE
            } else {
                BlockType::AIR
            }
        });
        assert_eq!(grid.get(1, 2, 3), Some(BlockType::STONE));
        assert_eq!(grid.get(3, 2, 1), Some(BlockType::AIR));
        assert_eq!(grid.solid_count(), 1);
    }

    #[test]
    fn out_of_bounds_is_not_solid() {
        let grid = BlockGrid::filled(2, 2, BlockType::DIRT);
        assert!(grid.is_solid(1, 1, 1));
        assert!(!grid.is_solid(2, 0, 0));
        assert_eq!(grid.get(0, 2, 0), None);
    }

    #[test]
    fn from_ids_decodes_and_validates() {
        let mut ids = vec![0u8; 2 * 2 * 2];
        ids[0] = 3;
        let grid = BlockGrid::from_ids(2, 2, &ids).unwrap();
        assert_eq!(grid.get(0, 0, 0), Some(BlockType::STONE));

        assert_eq!(
            BlockGrid::from_ids(2, 2, &ids[..5]),
            Err(GridError::LengthMismatch {
                expected: 8,
                actual: 5
            })
        );

        ids[7] = 99;
        assert_eq!(BlockGrid::from_ids(2, 2, &ids), Err(GridError::UnknownBlockId(99)));
    }

    #[test]
    fn iter_reports_storage_coordinates() {
        let grid = BlockGrid::from_fn(3, 2, |x, y, z| {
            if x == 2 && y == 1 && z == 0 {
                BlockType::WOOD
            } else {
                BlockType::AIR
            }
        });
        let solid: Vec<_> = grid.iter().filter(|(_, b)| b.is_solid()).collect();
        assert_eq!(solid, vec![((2, 1, 0), BlockType::WOOD)]);
    }
}

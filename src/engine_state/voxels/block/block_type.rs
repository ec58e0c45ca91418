//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion from raw ids.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// Each variant represents a distinct type of block. The `FromPrimitive` derive allows
/// conversion from integers, which is how externally supplied block grids are decoded.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize,
)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    #[default]
    AIR = 0,

    /// The top layer of a terrain column.
    GRASS = 1,

    /// The few layers directly beneath the grass.
    DIRT = 2,

    /// Everything deeper than the dirt layers.
    STONE = 3,

    /// A wooden block, not produced by the terrain generator.
    WOOD = 4,
}

impl BlockType {
    /// Converts a raw `BlockTypeSize` id into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a known block type.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The raw id of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this block occupies its voxel. Everything but air is solid and renderable.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// Picks a random solid block type using the given generator.
    pub fn random_solid(rng: &mut fastrand::Rng) -> Self {
        Self::from_id(rng.u8(1..=4)).unwrap_or(BlockType::DIRT)
    }
}

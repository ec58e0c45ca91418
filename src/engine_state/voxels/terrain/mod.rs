//! # Terrain Module
//!
//! Chunk generation strategies. The world never decides by itself what a chunk
//! contains; it asks the [`ChunkGenerator`] it was built with.
//!
//! Multiple terrain generation strategies are supported:
//! - Heightmap terrain over Perlin noise ([`TerrainGenerator`])
//! - Checkerboard pattern for testing
//! - Solid chunks (all blocks filled)
//! - Empty chunks (all blocks air)
//! - Random scatter, seeded per chunk

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    block::block_type::BlockType,
    chunk::{block_grid::BlockGrid, chunk_coord::ChunkCoord},
};

pub mod heightmap;
pub mod perlin;

pub use heightmap::{TerrainConfig, TerrainGenerator};

/// Fills the block grid of a chunk.
///
/// Generators are called from worker threads when the world streams in the
/// background, hence `Send + Sync`. They must be deterministic for a given position.
pub trait ChunkGenerator: Send + Sync {
    /// Produces the width x height x width grid of the chunk at `position`.
    fn generate(&self, position: ChunkCoord, width: usize, height: usize) -> BlockGrid;
}

impl<G: ChunkGenerator + ?Sized> ChunkGenerator for Box<G> {
    fn generate(&self, position: ChunkCoord, width: usize, height: usize) -> BlockGrid {
        (**self).generate(position, width, height)
    }
}

impl<G: ChunkGenerator + ?Sized> ChunkGenerator for Arc<G> {
    fn generate(&self, position: ChunkCoord, width: usize, height: usize) -> BlockGrid {
        (**self).generate(position, width, height)
    }
}

/// Fills every voxel with the same block type. `BlockType::AIR` gives empty chunks.
#[derive(Clone, Copy, Debug)]
pub struct FilledGenerator(pub BlockType);

impl ChunkGenerator for FilledGenerator {
    fn generate(&self, _position: ChunkCoord, width: usize, height: usize) -> BlockGrid {
        BlockGrid::filled(width, height, self.0)
    }
}

/// Alternates solid and air voxels in a 3D checkerboard.
#[derive(Clone, Copy, Debug)]
pub struct CheckerboardGenerator;

impl ChunkGenerator for CheckerboardGenerator {
    fn generate(&self, _position: ChunkCoord, width: usize, height: usize) -> BlockGrid {
        BlockGrid::from_fn(width, height, |x, y, z| {
            if (x + y + z) % 2 == 0 {
                BlockType::DIRT
            } else {
                BlockType::AIR
            }
        })
    }
}

/// Scatters random solid blocks; each voxel is air with probability `sparseness`.
#[derive(Clone, Copy, Debug)]
pub struct RandomGenerator {
    /// Probability of a voxel being air, in 0.0..=1.0
    pub sparseness: f64,
    /// World seed, mixed with the chunk position so every chunk differs
    pub seed: u64,
}

impl RandomGenerator {
    fn chunk_seed(&self, position: ChunkCoord) -> u64 {
        self.seed
            ^ (position.x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (position.y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ (position.z as u64).wrapping_mul(0x1656_67B1_9E37_79F9)
    }
}

impl ChunkGenerator for RandomGenerator {
    fn generate(&self, position: ChunkCoord, width: usize, height: usize) -> BlockGrid {
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(position));
        BlockGrid::from_fn(width, height, |_, _, _| {
            if rng.f64() < self.sparseness {
                BlockType::AIR
            } else {
                BlockType::random_solid(&mut rng)
            }
        })
    }
}

/// The method used to generate new chunks, as named in the world configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum GenerationMethod {
    /// Perlin heightmap terrain
    #[default]
    Perlin,
    /// 3D checkerboard
    Checkerboard,
    /// Every voxel solid
    Solid,
    /// Every voxel air
    Empty,
    /// Random scatter
    Random {
        /// Probability of air
        sparseness: f64,
        /// World seed
        seed: u64,
    },
}

impl GenerationMethod {
    /// Instantiates the generator for this method.
    pub fn build(self, terrain: TerrainConfig) -> Box<dyn ChunkGenerator> {
        match self {
            GenerationMethod::Perlin => Box::new(TerrainGenerator::perlin(terrain)),
            GenerationMethod::Checkerboard => Box::new(CheckerboardGenerator),
            GenerationMethod::Solid => Box::new(FilledGenerator(BlockType::DIRT)),
            GenerationMethod::Empty => Box::new(FilledGenerator(BlockType::AIR)),
            GenerationMethod::Random { sparseness, seed } => {
                Box::new(RandomGenerator { sparseness, seed })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_generator_is_deterministic_per_chunk() {
        let generator = RandomGenerator {
            sparseness: 0.5,
            seed: 42,
        };
        let a = generator.generate(ChunkCoord::new(1, 0, -1), 8, 8);
        let b = generator.generate(ChunkCoord::new(1, 0, -1), 8, 8);
        let c = generator.generate(ChunkCoord::new(-1, 0, 1), 8, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn checkerboard_fills_half_the_volume() {
        let grid = CheckerboardGenerator.generate(ChunkCoord::default(), 4, 4);
        assert_eq!(grid.solid_count(), 32);
    }

    #[test]
    fn methods_build_matching_generators() {
        let terrain = TerrainConfig::default();
        let solid = GenerationMethod::Solid.build(terrain).generate(ChunkCoord::default(), 2, 2);
        let empty = GenerationMethod::Empty.build(terrain).generate(ChunkCoord::default(), 2, 2);
        assert_eq!(solid.solid_count(), 8);
        assert_eq!(empty.solid_count(), 0);
    }
}

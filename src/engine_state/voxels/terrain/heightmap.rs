//! # Heightmap Terrain
//!
//! Column-based terrain: a 2D noise sample decides the surface height of every
//! (x, z) column, and each voxel is classified by its depth below that surface.
//!
//! ```text
//! world_y > height                    AIR
//! height - 1 < world_y <= height      GRASS
//! height - 5 < world_y <= height - 1  DIRT
//! otherwise                           STONE
//! ```
//!
//! The grass and dirt depths (1 and 5 above) come from [`TerrainConfig`].

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::{block_grid::BlockGrid, chunk_coord::ChunkCoord},
};

use super::{perlin::PerlinNoise, ChunkGenerator};

/// Shape parameters of the generated terrain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Height of the surface where the noise is 0 is `amplitude / 2`; the noise moves
    /// it by up to `amplitude` in either direction.
    pub amplitude: f64,
    /// Scale applied to world coordinates before sampling noise. Smaller is smoother.
    pub scale: f64,
    /// Depth below the surface that is still grass.
    pub grass_depth: f64,
    /// Depth below the surface where dirt ends and stone starts.
    pub dirt_depth: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            amplitude: 30.0,
            scale: 0.02,
            grass_depth: 1.0,
            dirt_depth: 5.0,
        }
    }
}

/// Generates heightmap terrain from any 3D noise source.
#[derive(Clone, Debug)]
pub struct TerrainGenerator<N = PerlinNoise> {
    noise: N,
    config: TerrainConfig,
}

impl TerrainGenerator<PerlinNoise> {
    /// Terrain over the built-in Perlin noise.
    pub fn perlin(config: TerrainConfig) -> Self {
        TerrainGenerator::new(PerlinNoise::new(), config)
    }
}

impl<N: NoiseFn<f64, 3>> TerrainGenerator<N> {
    /// Creates a generator sampling `noise`.
    pub fn new(noise: N, config: TerrainConfig) -> Self {
        TerrainGenerator { noise, config }
    }

    /// The generator's shape parameters.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Surface height of the column at world (x, z).
    pub fn surface_height(&self, world_x: f64, world_z: f64) -> f64 {
        let scale = self.config.scale;
        let sample = self.noise.get([world_x * scale, world_z * scale, 0.0]);
        self.config.amplitude * (0.5 + sample)
    }

    /// Classifies a voxel at `world_y` in a column whose surface is at `height`.
    pub fn classify(&self, world_y: f64, height: f64) -> BlockType {
        if world_y > height {
            BlockType::AIR
        } else if world_y > height - self.config.grass_depth {
            BlockType::GRASS
        } else if world_y > height - self.config.dirt_depth {
            BlockType::DIRT
        } else {
            BlockType::STONE
        }
    }
}

impl<N> ChunkGenerator for TerrainGenerator<N>
where
    N: NoiseFn<f64, 3> + Send + Sync,
{
    fn generate(&self, position: ChunkCoord, width: usize, height: usize) -> BlockGrid {
        let base_x = position.x as i64 * width as i64;
        let base_y = position.y as i64 * height as i64;
        let base_z = position.z as i64 * width as i64;

        // One noise sample per column, indexed x + width * z
        let mut heights = Vec::with_capacity(width * width);
        for z in 0..width {
            for x in 0..width {
                let world_x = (base_x + x as i64) as f64;
                let world_z = (base_z + z as i64) as f64;
                heights.push(self.surface_height(world_x, world_z));
            }
        }

        BlockGrid::from_fn(width, height, |x, y, z| {
            let world_y = (base_y + y as i64) as f64;
            self.classify(world_y, heights[x + width * z])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Constant;

    #[test]
    fn classifies_layers_by_depth() {
        let terrain = TerrainGenerator::perlin(TerrainConfig::default());
        assert_eq!(terrain.classify(20.5, 20.0), BlockType::AIR);
        assert_eq!(terrain.classify(20.0, 20.0), BlockType::GRASS);
        assert_eq!(terrain.classify(19.5, 20.0), BlockType::DIRT);
        assert_eq!(terrain.classify(15.5, 20.0), BlockType::DIRT);
        assert_eq!(terrain.classify(15.0, 20.0), BlockType::STONE);
    }

    #[test]
    fn flat_noise_gives_flat_layers() {
        // Constant 0 noise puts the surface at amplitude / 2 = 10
        let terrain = TerrainGenerator::new(
            Constant::new(0.0),
            TerrainConfig {
                amplitude: 20.0,
                ..TerrainConfig::default()
            },
        );
        let grid = terrain.generate(ChunkCoord::new(3, 0, -2), 4, 16);
        for x in 0..4 {
            for z in 0..4 {
                assert_eq!(grid.get(x, 11, z), Some(BlockType::AIR));
                assert_eq!(grid.get(x, 10, z), Some(BlockType::GRASS));
                assert_eq!(grid.get(x, 9, z), Some(BlockType::DIRT));
                assert_eq!(grid.get(x, 6, z), Some(BlockType::DIRT));
                assert_eq!(grid.get(x, 5, z), Some(BlockType::STONE));
                assert_eq!(grid.get(x, 0, z), Some(BlockType::STONE));
            }
        }
    }

    #[test]
    fn chunk_height_offsets_world_y() {
        let terrain = TerrainGenerator::new(Constant::new(0.0), TerrainConfig::default());
        // Surface at 15: a chunk stacked one level up (y from 16) is all air
        let grid = terrain.generate(ChunkCoord::new(0, 1, 0), 2, 16);
        assert_eq!(grid.solid_count(), 0);
    }
}

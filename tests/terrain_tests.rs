/// Integration tests for heightmap terrain generation
use voxel_world::{BlockType, ChunkCoord, ChunkGenerator, TerrainConfig, TerrainGenerator};

fn layer_rank(block_type: BlockType) -> u8 {
    match block_type {
        BlockType::STONE => 0,
        BlockType::DIRT => 1,
        BlockType::GRASS => 2,
        BlockType::AIR => 3,
        BlockType::WOOD => panic!("terrain never places wood"),
    }
}

#[test]
fn test_columns_are_layered_bottom_up() {
    let terrain = TerrainGenerator::perlin(TerrainConfig::default());
    for (cx, cz) in [(0, 0), (-1, 0), (0, -1), (5, -7), (-30, 12)] {
        let grid = terrain.generate(ChunkCoord::new(cx, 0, cz), 16, 64);
        for x in 0..16 {
            for z in 0..16 {
                let mut previous = 0;
                for y in 0..64 {
                    let rank = layer_rank(grid.get(x, y, z).unwrap());
                    assert!(
                        rank >= previous,
                        "layer order reversed at ({x}, {y}, {z}) in chunk ({cx}, {cz})"
                    );
                    previous = rank;
                }
            }
        }
    }
}

#[test]
fn test_origin_column_matches_height_formula() {
    // noise(0, 0, 0) is 0, so the surface at world (0, 0) is amplitude / 2 = 15
    let terrain = TerrainGenerator::perlin(TerrainConfig::default());
    assert_eq!(terrain.surface_height(0.0, 0.0), 15.0);

    let grid = terrain.generate(ChunkCoord::new(0, 0, 0), 16, 64);
    assert_eq!(grid.get(0, 15, 0), Some(BlockType::GRASS));
    assert_eq!(grid.get(0, 16, 0), Some(BlockType::AIR));
    assert_eq!(grid.get(0, 14, 0), Some(BlockType::DIRT));
    assert_eq!(grid.get(0, 10, 0), Some(BlockType::STONE));
}

#[test]
fn test_generation_is_deterministic_and_seamless() {
    let terrain = TerrainGenerator::perlin(TerrainConfig::default());
    let a = terrain.generate(ChunkCoord::new(2, 0, 3), 16, 64);
    let b = terrain.generate(ChunkCoord::new(2, 0, 3), 16, 64);
    assert_eq!(a, b);

    // Chunks sample world coordinates: the last column of one chunk and the first of
    // its neighbour are one block apart in the same heightmap
    let left = terrain.surface_height(2.0 * 16.0 + 15.0, 48.0);
    let right = terrain.surface_height(3.0 * 16.0, 48.0);
    assert!((left - right).abs() < 3.0);
}

#[test]
fn test_amplitude_and_scale_are_configurable() {
    let flat = TerrainGenerator::perlin(TerrainConfig {
        amplitude: 0.0,
        ..TerrainConfig::default()
    });
    let grid = flat.generate(ChunkCoord::new(4, 0, -9), 8, 8);
    // Surface pinned at 0: only the bottom layer is grass, the rest is air
    for x in 0..8 {
        for z in 0..8 {
            assert_eq!(grid.get(x, 0, z), Some(BlockType::GRASS));
            assert_eq!(grid.get(x, 1, z), Some(BlockType::AIR));
        }
    }

    let coarse = TerrainGenerator::perlin(TerrainConfig {
        scale: 1.0,
        ..TerrainConfig::default()
    });
    // With scale 1 every block corner is a lattice point
    assert_eq!(coarse.surface_height(37.0, -12.0), 15.0);
}

#[test]
fn test_heights_stay_within_amplitude_bounds() {
    let config = TerrainConfig::default();
    let terrain = TerrainGenerator::perlin(config);
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..10_000 {
        let (x, z) = (rng.f64() * 10_000.0 - 5_000.0, rng.f64() * 10_000.0 - 5_000.0);
        let height = terrain.surface_height(x, z);
        assert!(height >= -0.5 * config.amplitude && height <= 1.5 * config.amplitude);
    }
}

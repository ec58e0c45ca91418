#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A streaming voxel world built with Rust and WGPU.
//!
//! The world is a grid of fixed-size chunks. Chunks are filled by a generator (Perlin
//! heightmap terrain by default), turned into face-culled surface meshes, uploaded to
//! the GPU, and loaded and evicted as the viewpoint moves.
//!
//! ## Key Modules
//!
//! * `config` - The world configuration and how it is loaded
//! * `engine_state` - Blocks, chunks, terrain, meshing, the GPU seam and the world
//! * `application_state` - The headless driver behind [`run`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = WorldConfig::default();
//! let mut world = World::new(&config, allocator)?;
//!
//! // Every frame
//! world.update(viewpoint)?;
//! world.render(&mut render_handle)?;
//! ```
//!
//! `allocator` implements [`GpuAllocator`] and `render_handle` implements
//! [`RenderHandle`]; [`WgpuAllocator`] and [`WgpuRenderHandle`] are the `wgpu`
//! implementations.

use application_state::ApplicationState;
use log::{error, info};

pub mod application_state;
pub mod config;
pub mod engine_state;

pub use config::{ConfigError, WorldConfig, MAX_RENDER_DISTANCE};
pub use engine_state::{
    rendering::{
        gpu::{GpuAllocator, GpuError, RenderError, RenderHandle, MODEL_UNIFORM},
        meshing::{build_mesh, Mesh},
        vertex::{Vertex, VERTEX_STRIDE_FLOATS},
        wgpu_backend::{WgpuAllocator, WgpuChunkBuffers, WgpuRenderHandle},
    },
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        chunk::{
            block_grid::{BlockGrid, GridError},
            chunk_coord::ChunkCoord,
            Chunk,
        },
        terrain::{
            perlin::{noise, PerlinNoise},
            ChunkGenerator, GenerationMethod, TerrainConfig, TerrainGenerator,
        },
        world::{StreamingMode, UpdateStats, World, WorldError},
    },
};

/// Runs the headless streaming driver.
///
/// Initializes logging from `RUST_LOG`, loads the configuration named by
/// `VOXEL_WORLD_CONFIG` (defaults otherwise), acquires a graphics device and streams
/// the world along a scripted path. Exits the process with status 1 on failure.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let result = WorldConfig::from_env()
        .map_err(Into::into)
        .and_then(|config| ApplicationState::new(&config))
        .and_then(|mut state| state.run());

    match result {
        Ok(summary) => info!("Finished after {} frames", summary.frames),
        Err(error) => {
            error!("{error}");
            std::process::exit(1);
        }
    }
}

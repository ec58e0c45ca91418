//! # Voxel Engine Core
//!
//! This module contains the core voxel functionality: representing the world as
//! chunks of blocks, generating their contents, and streaming them around a viewpoint.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines individual voxel types and the six faces of a block
//! * **Chunk**: Fixed-size 3D grids of blocks together with their mesh and GPU buffers
//! * **Terrain**: Noise and the strategies that fill a chunk's block grid
//! * **World**: Loads and evicts chunks around the viewpoint and draws them
//! * **Tasks**: Chunk builds that run on worker threads
//!
//! ## Data Flow
//!
//! 1. The world finds the chunks missing around the viewpoint
//! 2. A chunk generator fills each block grid
//! 3. The mesher turns the grid into a face-culled surface mesh
//! 4. The mesh is uploaded through the GPU allocator and the chunk is inserted
//! 5. Chunks out of range are evicted and their buffers released
//!
//! ## Thread Safety
//!
//! * Generators are `Send + Sync` and shared with the workers through an `Arc`
//! * Workers only produce block grids and meshes; they never touch the GPU
//! * The world itself is owned by a single thread

pub mod block;
pub mod chunk;
pub mod tasks;
pub mod terrain;
pub mod world;

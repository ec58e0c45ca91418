//! # Engine State Module
//!
//! The core engine module holding the voxel world and everything it needs.
//!
//! ## Key Components
//!
//! * `rendering` - Vertex format, mesher, GPU capability traits and the `wgpu` backend
//! * `task_management` - Worker threads for chunk builds
//! * `voxels` - Blocks, chunks, terrain generation and the streaming world
//!
//! ## Architecture
//!
//! Each subsystem is responsible for one aspect of the engine. The `World` in
//! `voxels` is the central coordinator: it drives generation through `voxels::terrain`,
//! meshing and upload through `rendering`, and background builds through
//! `task_management`.

pub mod rendering;
pub mod task_management;
pub mod voxels;

//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation and processing.
//! These tasks are designed to be processed asynchronously to maintain smooth
//! performance while the viewpoint moves through the world.

pub mod chunk_build_task;

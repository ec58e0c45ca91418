//! # World Module
//!
//! This module provides the `World` struct which manages the collection of loaded chunks
//! in the voxel world. It serves as the central coordinator for chunk loading, unloading,
//! and per-frame rendering.
//!
//! ## Architecture
//!
//! The world keeps only the chunks within the render distance of the viewpoint. Every
//! `update` loads the missing chunks of the square around the viewpoint's chunk and
//! evicts the loaded chunks outside it, so the world is effectively infinite while
//! memory stays bounded by `(2 * render_distance + 1)^2` chunks.
//!
//! ## Streaming Modes
//!
//! - `Inline`: chunks are generated, meshed and uploaded inside `update`
//! - `Background`: generation and meshing run on worker threads; `update` schedules
//!   missing chunks and uploads whatever finished since the last call
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map keyed by `ChunkCoord`
//! - GPU buffers are only ever created and released on the thread owning the world
//! - A chunk is never scheduled twice while a build for it is in flight

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use cgmath::{Matrix4, Point3};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{ConfigError, WorldConfig},
    engine_state::{
        rendering::gpu::{GpuAllocator, GpuError, RenderError, RenderHandle, MODEL_UNIFORM},
        task_management::TaskManager,
        voxels::{
            chunk::{chunk_coord::ChunkCoord, Chunk},
            tasks::chunk_build_task::{build_chunk, ChunkBuildResult, ChunkBuildTask},
            terrain::ChunkGenerator,
        },
    },
};

/// Where chunk generation and meshing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum StreamingMode {
    /// Everything happens inside `World::update`.
    #[default]
    Inline,
    /// Generation and meshing run on a pool of `workers` threads.
    Background {
        /// Number of worker threads
        workers: usize,
    },
}

/// Errors reported by the world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Uploading the mesh of a chunk failed; the chunk was not inserted.
    #[error("failed to upload chunk {position}: {source}")]
    Upload {
        /// The chunk that could not be uploaded
        position: ChunkCoord,
        /// The allocator's error
        #[source]
        source: GpuError,
    },
    /// The world configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What a call to `World::update` or `World::wait_idle` changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Chunks uploaded and inserted
    pub inserted: usize,
    /// Chunks evicted and released
    pub evicted: usize,
    /// Builds still in flight or queued afterwards
    pub pending: usize,
}

/// The set of loaded chunks around a moving viewpoint.
///
/// `A` is the allocator that owns the chunks' GPU buffers. Every chunk that leaves the
/// world, by eviction, `clear` or dropping the world, hands its buffers back to it.
///
/// # Examples
///
/// ```rust,ignore
/// let mut world = World::new(&WorldConfig::default(), allocator)?;
///
/// // Every frame
/// world.update(camera_position)?;
/// world.render(&mut render_handle)?;
/// ```
pub struct World<A: GpuAllocator> {
    /// Loaded chunks, keyed by chunk coordinates
    chunks: HashMap<ChunkCoord, Chunk<A::Buffers>>,
    chunk_width: usize,
    chunk_height: usize,
    render_distance: u32,
    generator: Arc<dyn ChunkGenerator>,
    allocator: A,
    /// Worker pool, present in background mode only
    task_manager: Option<TaskManager<ChunkBuildTask>>,
    /// Coordinates with a build in flight or queued
    pending: HashSet<ChunkCoord>,
    /// Chunk containing the viewpoint of the last update
    current_chunk: Option<ChunkCoord>,
}

impl<A: GpuAllocator> World<A> {
    /// Creates an empty world generating chunks with the configured generation method.
    ///
    /// # Errors
    /// Returns `WorldError::Config` if the configuration is invalid.
    pub fn new(config: &WorldConfig, allocator: A) -> Result<Self, WorldError> {
        let generator = Arc::from(config.generation.build(config.terrain));
        Self::with_generator(config, generator, allocator)
    }

    /// Creates an empty world filling chunks with `generator`. The configuration's
    /// generation settings are ignored.
    ///
    /// # Errors
    /// Returns `WorldError::Config` if the configuration is invalid.
    pub fn with_generator(
        config: &WorldConfig,
        generator: Arc<dyn ChunkGenerator>,
        allocator: A,
    ) -> Result<Self, WorldError> {
        config.validate()?;

        let task_manager = match config.streaming {
            StreamingMode::Inline => None,
            StreamingMode::Background { workers } => {
                let task_manager = TaskManager::new(workers);
                if task_manager.num_workers() == 0 {
                    warn!("No chunk workers could be started, streaming inline");
                    None
                } else {
                    Some(task_manager)
                }
            }
        };

        info!(
            "Created world: {}x{}x{} chunks, render distance {}, {} streaming",
            config.chunk_width,
            config.chunk_height,
            config.chunk_width,
            config.render_distance,
            if task_manager.is_some() { "background" } else { "inline" }
        );

        Ok(World {
            chunks: HashMap::new(),
            chunk_width: config.chunk_width as usize,
            chunk_height: config.chunk_height as usize,
            render_distance: config.render_distance,
            generator,
            allocator,
            task_manager,
            pending: HashSet::new(),
            current_chunk: None,
        })
    }

    /// Streams chunks around `viewpoint`.
    ///
    /// The insertion pass loads every missing chunk within the render distance (inline),
    /// or schedules it and uploads finished builds (background). The eviction pass then
    /// releases every loaded chunk outside the render distance. Both passes run even if
    /// the viewpoint stayed in the same chunk, which makes repeated calls idempotent.
    ///
    /// # Errors
    /// An upload failure stops the insertion pass; the failed chunk is not inserted and
    /// will be retried on the next update. The eviction pass still runs.
    pub fn update(&mut self, viewpoint: Point3<f32>) -> Result<UpdateStats, WorldError> {
        let center = self.center_of(viewpoint);
        if self.current_chunk != Some(center) {
            debug!("Viewpoint entered chunk {center}");
            self.current_chunk = Some(center);
        }

        let mut stats = UpdateStats::default();
        let insertion = if self.task_manager.is_some() {
            self.schedule_missing(center);
            let results = self.collect_finished();
            self.accept_results(results, Some(center), &mut stats)
        } else {
            self.insert_missing(center, &mut stats)
        };

        stats.evicted = self.evict_outside(center);
        stats.pending = self.pending.len();

        if stats.inserted > 0 || stats.evicted > 0 {
            debug!(
                "World update at {}: {} inserted, {} evicted, {} pending, {} loaded",
                center,
                stats.inserted,
                stats.evicted,
                stats.pending,
                self.chunks.len()
            );
        }

        insertion.map(|_| stats)
    }

    /// Blocks until no build is queued or in flight, uploading the finished ones.
    ///
    /// Results for chunks that left the render distance meanwhile are discarded, and so
    /// is every result when there is no viewpoint (before the first update or after
    /// [`Self::clear`]). Does nothing in inline mode.
    ///
    /// # Errors
    /// Returns the first upload failure; remaining builds are still drained.
    pub fn wait_idle(&mut self) -> Result<UpdateStats, WorldError> {
        let mut stats = UpdateStats::default();
        let mut outcome = Ok(());

        loop {
            let Some(task_manager) = self.task_manager.as_mut() else {
                break;
            };
            if task_manager.is_idle() {
                break;
            }

            let results = task_manager.wait_for_completed_tasks();
            task_manager.process_queued_tasks();
            if results.is_empty() && task_manager.num_in_flight() == 0 {
                warn!(
                    "Chunk workers stopped with {} builds queued",
                    task_manager.num_queued()
                );
                break;
            }

            let accepted = self.accept_results(results, self.current_chunk, &mut stats);
            if outcome.is_ok() {
                outcome = accepted;
            }
        }

        stats.pending = self.pending.len();
        outcome.map(|_| stats)
    }

    /// Draws every loaded chunk.
    ///
    /// Binds `handle` once, then sets the `"model"` transform to each chunk's world origin
    /// before drawing it. Chunks with an empty mesh issue no draw call.
    pub fn render<R>(&self, handle: &mut R) -> Result<(), RenderError>
    where
        R: RenderHandle<Buffers = A::Buffers>,
    {
        handle.bind();
        for chunk in self.chunks.values() {
            handle.set_mat4(MODEL_UNIFORM, &Matrix4::from_translation(chunk.origin()))?;
            chunk.render(handle);
        }
        Ok(())
    }

    /// Evicts every loaded chunk, releasing its buffers, and forgets the viewpoint.
    /// Pending builds run to completion and are discarded when drained before the next
    /// update.
    ///
    /// # Returns
    /// The number of chunks evicted.
    pub fn clear(&mut self) -> usize {
        let count = self.chunks.len();
        for (_, chunk) in self.chunks.drain() {
            chunk.release(&mut self.allocator);
        }
        self.current_chunk = None;
        count
    }

    /// Coordinates of every loaded chunk, in no particular order.
    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// The loaded chunk at `coord`, if any.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk<A::Buffers>> {
        self.chunks.get(&coord)
    }

    /// Whether the chunk at `coord` is loaded.
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Whether a build for `coord` is queued or in flight.
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of builds queued or in flight.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The chunk that contained the viewpoint at the last update.
    pub fn current_chunk(&self) -> Option<ChunkCoord> {
        self.current_chunk
    }

    /// Chebyshev radius, in chunks, of the loaded square.
    pub fn render_distance(&self) -> u32 {
        self.render_distance
    }

    /// Chunk extent along x and z, in blocks.
    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Chunk extent along y, in blocks.
    pub fn chunk_height(&self) -> usize {
        self.chunk_height
    }

    /// Whether chunks are built on worker threads.
    pub fn is_background(&self) -> bool {
        self.task_manager.is_some()
    }

    /// The allocator owning the chunks' buffers.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// The chunk containing `viewpoint`, pulled in from the edge of the coordinate range
    /// so the whole square around it stays addressable.
    fn center_of(&self, viewpoint: Point3<f32>) -> ChunkCoord {
        let center = ChunkCoord::containing(viewpoint, self.chunk_width as u32);
        let margin = i32::try_from(self.render_distance).unwrap_or(i32::MAX);
        let (low, high) = (i32::MIN.saturating_add(margin), i32::MAX.saturating_sub(margin));
        ChunkCoord::new(center.x.clamp(low, high), 0, center.z.clamp(low, high))
    }

    /// Coordinates of the square of radius `distance` around `center`, at y = 0.
    fn coords_around(center: ChunkCoord, distance: u32) -> impl Iterator<Item = ChunkCoord> {
        let distance = i32::try_from(distance).unwrap_or(i32::MAX);
        (center.x.saturating_sub(distance)..=center.x.saturating_add(distance)).flat_map(
            move |x| {
                (center.z.saturating_sub(distance)..=center.z.saturating_add(distance))
                    .map(move |z| ChunkCoord::new(x, 0, z))
            },
        )
    }

    fn in_range(&self, coord: ChunkCoord, center: ChunkCoord) -> bool {
        coord.horizontal_distance(center) <= self.render_distance
    }

    /// Inline insertion pass.
    fn insert_missing(
        &mut self,
        center: ChunkCoord,
        stats: &mut UpdateStats,
    ) -> Result<(), WorldError> {
        for coord in Self::coords_around(center, self.render_distance) {
            if self.chunks.contains_key(&coord) {
                continue;
            }
            let built = build_chunk(
                self.generator.as_ref(),
                coord,
                self.chunk_width,
                self.chunk_height,
            );
            self.insert_built(built)?;
            stats.inserted += 1;
        }
        Ok(())
    }

    /// Publishes a build for every missing coordinate that has none in flight.
    fn schedule_missing(&mut self, center: ChunkCoord) {
        let Some(task_manager) = self.task_manager.as_mut() else {
            return;
        };

        for coord in Self::coords_around(center, self.render_distance) {
            if self.chunks.contains_key(&coord) || !self.pending.insert(coord) {
                continue;
            }
            task_manager.publish_task(ChunkBuildTask::new(
                coord,
                Arc::clone(&self.generator),
                self.chunk_width,
                self.chunk_height,
            ));
        }
        task_manager.process_queued_tasks();
    }

    /// Non-blocking collection of finished background builds.
    fn collect_finished(&mut self) -> Vec<ChunkBuildResult> {
        let Some(task_manager) = self.task_manager.as_mut() else {
            return Vec::new();
        };
        let results = task_manager.process_completed_tasks();
        task_manager.process_queued_tasks();
        results
    }

    /// Uploads finished builds that are still in range.
    ///
    /// After an upload failure the remaining results are dropped; their coordinates are
    /// no longer pending, so the next update schedules them again.
    fn accept_results(
        &mut self,
        results: Vec<ChunkBuildResult>,
        center: Option<ChunkCoord>,
        stats: &mut UpdateStats,
    ) -> Result<(), WorldError> {
        let mut outcome = Ok(());
        for result in results {
            self.pending.remove(&result.position);

            if outcome.is_err() {
                continue;
            }
            let Some(center) = center else {
                trace!("Discarding chunk {} built without a viewpoint", result.position);
                continue;
            };
            if !self.in_range(result.position, center) {
                trace!("Discarding chunk {} built out of range", result.position);
                continue;
            }
            if self.chunks.contains_key(&result.position) {
                continue;
            }

            match self.insert_built(result) {
                Ok(()) => stats.inserted += 1,
                Err(error) => outcome = Err(error),
            }
        }
        outcome
    }

    fn insert_built(&mut self, built: ChunkBuildResult) -> Result<(), WorldError> {
        let position = built.position;
        let chunk = Chunk::from_mesh(position, built.blocks, built.mesh, &mut self.allocator)
            .map_err(|source| {
                warn!("Chunk {position} upload failed: {source}");
                WorldError::Upload { position, source }
            })?;
        self.chunks.insert(position, chunk);
        Ok(())
    }

    /// Eviction pass. Returns the number of chunks released.
    fn evict_outside(&mut self, center: ChunkCoord) -> usize {
        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| !self.in_range(**coord, center))
            .copied()
            .collect();

        for coord in &stale {
            if let Some(chunk) = self.chunks.remove(coord) {
                trace!("Evicting chunk {coord}");
                chunk.release(&mut self.allocator);
            }
        }
        stale.len()
    }
}

impl<A: GpuAllocator> Drop for World<A> {
    fn drop(&mut self) {
        let released = self.clear();
        if released > 0 {
            debug!("Released {released} chunks on world drop");
        }
    }
}

//! # Application State Management
//!
//! The headless streaming driver: it owns the graphics device and the world, moves the
//! viewpoint along a scripted path and logs what the world streams in and out.
//!
//! ## Lifecycle
//! 1. The graphics device is acquired (`graphics_resources_builder`)
//! 2. A world is built over a `WgpuAllocator` on that device
//! 3. Every frame updates the world at the next viewpoint and, when the device
//!    supports it, renders the loaded chunks offscreen
//! 4. Dropping the application releases every chunk's buffers

pub mod graphics_resources_builder;

use cgmath::{Deg, Point3, Rad, Vector3};
use graphics_resources_builder::{create_graphics, Graphics, GraphicsError};
use log::{debug, info};
use thiserror::Error;
use web_time::Instant;

use crate::{
    config::{ConfigError, WorldConfig},
    engine_state::{
        rendering::{
            camera::{Camera, CameraUniform, Projection},
            chunk_renderer::ChunkRenderer,
            gpu::RenderError,
            wgpu_backend::WgpuAllocator,
        },
        voxels::world::{UpdateStats, World, WorldError},
    },
};

/// Size of the offscreen frames.
const FRAME_WIDTH: u32 = 1280;
const FRAME_HEIGHT: u32 = 720;

/// Height of the viewpoint above the world origin, in blocks.
const VIEWPOINT_HEIGHT: f32 = 48.0;

/// Errors that end the driver.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The graphics device could not be acquired.
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    /// Streaming failed.
    #[error(transparent)]
    World(#[from] WorldError),
    /// Rendering a frame failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Totals over a whole run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunSummary {
    /// Frames stepped
    pub frames: usize,
    /// Chunks inserted over the run
    pub inserted: usize,
    /// Chunks evicted over the run
    pub evicted: usize,
}

impl RunSummary {
    fn record(&mut self, stats: UpdateStats) {
        self.inserted += stats.inserted;
        self.evicted += stats.evicted;
    }
}

/// The initialized headless application.
pub struct ApplicationState {
    // Declared before `graphics` so chunk buffers are released while the device is alive
    world: World<WgpuAllocator>,
    renderer: Option<ChunkRenderer>,
    projection: Projection,
    graphics: Graphics,
    chunk_width: f32,
}

impl ApplicationState {
    /// Acquires the graphics device and builds an empty world for `config`.
    pub fn new(config: &WorldConfig) -> Result<Self, ApplicationError> {
        let graphics = create_graphics()?;
        let allocator = WgpuAllocator::new(graphics.device.clone(), config.gpu_budget);
        let world = World::new(config, allocator)?;
        let renderer = graphics
            .can_render
            .then(|| ChunkRenderer::new(&graphics.device, FRAME_WIDTH, FRAME_HEIGHT));

        Ok(ApplicationState {
            world,
            renderer,
            projection: Projection::new(FRAME_WIDTH, FRAME_HEIGHT, Deg(70.0), 0.1, 1000.0),
            graphics,
            chunk_width: config.chunk_width as f32,
        })
    }

    /// The scripted viewpoint path: a walk along +X, a diagonal back across the origin
    /// into negative coordinates, then a jump far away and one back.
    pub fn scripted_path(chunk_width: f32) -> Vec<Point3<f32>> {
        let step = chunk_width * 0.5;
        let mut path = Vec::new();

        let mut position = Point3::new(0.5, VIEWPOINT_HEIGHT, 0.5);
        path.push(position);
        for _ in 0..16 {
            position += Vector3::new(step, 0.0, 0.0);
            path.push(position);
        }
        for _ in 0..24 {
            position += Vector3::new(-step, 0.0, -step * 0.5);
            path.push(position);
        }
        path.push(Point3::new(chunk_width * 1000.0, VIEWPOINT_HEIGHT, chunk_width * -1000.0));
        path.push(Point3::new(0.5, VIEWPOINT_HEIGHT, 0.5));
        path
    }

    /// Runs the whole scripted path, one world update (and frame) per viewpoint.
    pub fn run(&mut self) -> Result<RunSummary, ApplicationError> {
        let path = Self::scripted_path(self.chunk_width);
        let mut summary = RunSummary::default();
        let start = Instant::now();

        let mut previous = path.first().copied().unwrap_or(Point3::new(0.0, 0.0, 0.0));
        for (frame, viewpoint) in path.into_iter().enumerate() {
            let mut stats = self.world.update(viewpoint)?;
            if frame == 0 && self.world.is_background() {
                // Start with a complete square rather than an empty frame
                let drained = self.world.wait_idle()?;
                stats.inserted += drained.inserted;
                stats.pending = drained.pending;
            }
            summary.record(stats);
            summary.frames += 1;

            self.render(viewpoint, viewpoint - previous)?;
            previous = viewpoint;

            debug!(
                "Frame {frame} at ({:.1}, {:.1}): {} loaded, {} inserted, {} evicted, {} pending",
                viewpoint.x,
                viewpoint.z,
                self.world.len(),
                stats.inserted,
                stats.evicted,
                stats.pending
            );
        }

        let drained = self.world.wait_idle()?;
        summary.record(drained);

        let allocator = self.world.allocator();
        info!(
            "Streamed {} frames in {:?}: {} chunks inserted, {} evicted, {} loaded ({} buffer pairs, {} bytes)",
            summary.frames,
            start.elapsed(),
            summary.inserted,
            summary.evicted,
            self.world.len(),
            allocator.live_buffers(),
            allocator.used_memory()
        );

        Ok(summary)
    }

    /// Renders the loaded chunks from `viewpoint`, looking along `heading`.
    fn render(&self, viewpoint: Point3<f32>, heading: Vector3<f32>) -> Result<(), ApplicationError> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Ok(());
        };

        // atan2(0, 0) is 0, so standing still looks along +X
        let yaw = Rad(heading.z.atan2(heading.x));
        let camera = Camera::new(viewpoint, yaw, Deg(-25.0));
        let uniform = CameraUniform::new(&camera, &self.projection);

        renderer.render_frame(&self.graphics.device, &self.graphics.queue, &self.world, &uniform)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_path_crosses_into_negative_chunks_and_jumps() {
        let path = ApplicationState::scripted_path(16.0);
        assert!(path.iter().any(|p| p.x < 0.0 && p.z < 0.0));
        assert!(path.iter().any(|p| p.x > 16.0 * 100.0));
        assert_eq!(path.last().copied(), Some(Point3::new(0.5, VIEWPOINT_HEIGHT, 0.5)));
    }
}

//! # Graphics Resources Builder
//!
//! This module acquires the WebGPU resources the headless driver needs: an adapter,
//! a device and its queue. No window or surface is involved.
//!
//! Rendering frames needs vertex push constants for the per-chunk model matrix. They
//! are requested when the adapter supports them; without them the device can still
//! hold chunk buffers, and the driver streams without rendering.

use log::{info, warn};
use thiserror::Error;
use wgpu::{Adapter, Device, Features, Instance, Queue};

use crate::engine_state::rendering::chunk_renderer::ChunkRenderer;

/// Errors raised while acquiring the graphics device.
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// No adapter matched the request.
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    /// The adapter refused to create a device.
    #[error("failed to create graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Contains all graphics-related resources required by the application.
pub struct Graphics {
    /// Kept alive for the lifetime of the device
    pub instance: Instance,
    /// The adapter the device was created from
    pub adapter: Adapter,
    /// The logical device
    pub device: Device,
    /// The device's command queue
    pub queue: Queue,
    /// Whether the device was created with what `ChunkRenderer` needs
    pub can_render: bool,
}

/// Creates the instance, adapter and device, blocking until they are ready.
///
/// The backends can be narrowed with the `WGPU_BACKEND` environment variable.
pub fn create_graphics() -> Result<Graphics, GraphicsError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::from_env().unwrap_or(wgpu::Backends::PRIMARY),
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    pollster::block_on(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            "Using adapter {} ({:?}, {:?})",
            adapter_info.name, adapter_info.backend, adapter_info.device_type
        );

        let mut required_features = Features::empty();
        let mut required_limits = wgpu::Limits::downlevel_defaults();

        let render_limits = ChunkRenderer::required_limits(required_limits.clone());
        let can_render = adapter.features().contains(ChunkRenderer::required_features())
            && adapter.limits().max_push_constant_size >= render_limits.max_push_constant_size;

        if can_render {
            required_features |= ChunkRenderer::required_features();
            required_limits = render_limits;
        } else {
            warn!("Adapter lacks push constants, frames will not be rendered");
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features,
                required_limits,
                label: Some("Voxel World Device"),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Graphics {
            instance,
            adapter,
            device,
            queue,
            can_render,
        })
    })
}

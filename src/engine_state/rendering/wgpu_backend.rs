//! # WGPU Backend
//!
//! `wgpu` implementations of the GPU capabilities used by the voxel core.
//!
//! * [`WgpuAllocator`] creates one vertex buffer and one index buffer per chunk with
//!   `create_buffer_init`, and keeps track of how much memory chunk meshes use so an
//!   optional budget can be enforced.
//! * [`WgpuRenderHandle`] records draws into an existing render pass. The model
//!   transform is passed as a vertex-stage push constant, so the pipeline layout must
//!   include [`WgpuRenderHandle::push_constant_range`] and the device must be created
//!   with `Features::PUSH_CONSTANTS`.

use std::mem::size_of_val;

use cgmath::Matrix4;
use log::{debug, warn};
use wgpu::util::DeviceExt;

use super::gpu::{GpuAllocator, GpuError, RenderError, RenderHandle, MODEL_UNIFORM};

/// GPU-side geometry of one chunk.
#[derive(Debug)]
pub struct WgpuChunkBuffers {
    /// Interleaved position/normal/uv vertex data
    pub vertex_buffer: wgpu::Buffer,
    /// `u32` triangle-list indices
    pub index_buffer: wgpu::Buffer,
    /// Bytes accounted against the allocator budget
    bytes: u64,
}

/// Allocates chunk mesh buffers on a `wgpu` device.
pub struct WgpuAllocator {
    device: wgpu::Device,
    /// Upper bound on the bytes held by live chunk buffers, if any
    budget: Option<u64>,
    /// Bytes currently held by live chunk buffers
    used_memory: u64,
    /// Number of buffer pairs currently alive
    live_buffers: usize,
}

impl WgpuAllocator {
    /// Creates an allocator for `device`. With `budget` set, allocations that would push
    /// live chunk memory past it fail with [`GpuError::ResourceExhausted`].
    pub fn new(device: wgpu::Device, budget: Option<u64>) -> Self {
        WgpuAllocator {
            device,
            budget,
            used_memory: 0,
            live_buffers: 0,
        }
    }

    /// Bytes currently held by live chunk buffers.
    pub fn used_memory(&self) -> u64 {
        self.used_memory
    }

    /// Number of buffer pairs created and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.live_buffers
    }
}

impl GpuAllocator for WgpuAllocator {
    type Buffers = WgpuChunkBuffers;

    fn create_buffers(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<Self::Buffers, GpuError> {
        let bytes = (size_of_val(vertices) + size_of_val(indices)) as u64;

        if let Some(budget) = self.budget {
            let available = budget.saturating_sub(self.used_memory);
            if bytes > available {
                warn!("Chunk upload of {bytes} bytes exceeds GPU budget ({available} bytes left)");
                return Err(GpuError::ResourceExhausted {
                    requested: bytes,
                    available,
                });
            }
        }

        let largest = size_of_val(vertices).max(size_of_val(indices)) as u64;
        check_buffer_limit(largest, self.device.limits().max_buffer_size)?;

        // Scopes nest; the validation scope is popped first
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        if let Some(error) = validation.or(out_of_memory) {
            vertex_buffer.destroy();
            index_buffer.destroy();
            let available = self
                .budget
                .map_or(0, |budget| budget.saturating_sub(self.used_memory));
            let error = scope_error(error, bytes, available);
            warn!("Chunk upload of {bytes} bytes failed: {error}");
            return Err(error);
        }

        self.used_memory += bytes;
        self.live_buffers += 1;

        Ok(WgpuChunkBuffers {
            vertex_buffer,
            index_buffer,
            bytes,
        })
    }

    fn release(&mut self, buffers: Self::Buffers) {
        buffers.vertex_buffer.destroy();
        buffers.index_buffer.destroy();
        self.used_memory = self.used_memory.saturating_sub(buffers.bytes);
        self.live_buffers = self.live_buffers.saturating_sub(1);
        debug!(
            "Released chunk buffers ({} bytes), {} pairs still alive",
            buffers.bytes, self.live_buffers
        );
    }
}

/// Rejects a buffer the device cannot create at all.
fn check_buffer_limit(largest: u64, max_buffer_size: u64) -> Result<(), GpuError> {
    if largest > max_buffer_size {
        return Err(GpuError::Backend(format!(
            "chunk buffer of {largest} bytes exceeds the device limit of {max_buffer_size} bytes"
        )));
    }
    Ok(())
}

/// Maps an error caught by an error scope around buffer creation.
fn scope_error(error: wgpu::Error, requested: u64, available: u64) -> GpuError {
    match error {
        wgpu::Error::OutOfMemory { .. } => GpuError::ResourceExhausted {
            requested,
            available,
        },
        other => GpuError::Backend(other.to_string()),
    }
}

/// Records chunk draws into a `wgpu` render pass.
pub struct WgpuRenderHandle<'a, 'encoder> {
    render_pass: &'a mut wgpu::RenderPass<'encoder>,
    pipeline: &'a wgpu::RenderPipeline,
}

impl<'a, 'encoder> WgpuRenderHandle<'a, 'encoder> {
    /// Wraps `render_pass`; `pipeline` must consume [`super::Vertex::desc`] at slot 0.
    pub fn new(
        render_pass: &'a mut wgpu::RenderPass<'encoder>,
        pipeline: &'a wgpu::RenderPipeline,
    ) -> Self {
        WgpuRenderHandle {
            render_pass,
            pipeline,
        }
    }

    /// Push constant range holding the model matrix, for the pipeline layout.
    pub fn push_constant_range() -> wgpu::PushConstantRange {
        wgpu::PushConstantRange {
            stages: wgpu::ShaderStages::VERTEX,
            range: 0..std::mem::size_of::<[[f32; 4]; 4]>() as u32,
        }
    }
}

impl RenderHandle for WgpuRenderHandle<'_, '_> {
    type Buffers = WgpuChunkBuffers;

    fn bind(&mut self) {
        self.render_pass.set_pipeline(self.pipeline);
    }

    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) -> Result<(), RenderError> {
        if name != MODEL_UNIFORM {
            return Err(RenderError::UnknownUniform(name.to_string()));
        }

        let raw: [[f32; 4]; 4] = (*value).into();
        self.render_pass
            .set_push_constants(wgpu::ShaderStages::VERTEX, 0, bytemuck::cast_slice(&raw));
        Ok(())
    }

    fn draw_indexed(&mut self, buffers: &Self::Buffers, index_count: u32) {
        self.render_pass
            .set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        self.render_pass
            .set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.render_pass.draw_indexed(0..index_count, 0, 0..1);
    }
}

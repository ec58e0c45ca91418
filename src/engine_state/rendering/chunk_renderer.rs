//! # Chunk Renderer
//!
//! Renders the loaded chunks of a world into an offscreen color target.
//!
//! The pipeline consumes [`Vertex::desc`] at slot 0, reads the view-projection matrix
//! from a camera uniform at group 0 and receives each chunk's model matrix as a vertex
//! push constant set through [`WgpuRenderHandle`].

use log::debug;
use wgpu::util::DeviceExt;

use crate::engine_state::voxels::world::World;

use super::{
    camera::CameraUniform,
    gpu::RenderError,
    texture::Texture,
    vertex::Vertex,
    wgpu_backend::{WgpuAllocator, WgpuRenderHandle},
};

/// WGSL source of the chunk pipeline.
pub const CHUNK_SHADER: &str = include_str!("../../../assets/shaders/chunk_shader.wgsl");

/// Clear color of the offscreen target.
const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.53,
    g: 0.75,
    b: 0.92,
    a: 1.0,
};

/// Owns the chunk render pipeline and the offscreen attachments it draws into.
pub struct ChunkRenderer {
    render_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    color_target: Texture,
    depth_texture: Texture,
}

impl ChunkRenderer {
    /// Device features the pipeline relies on.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::PUSH_CONSTANTS
    }

    /// Device limits the pipeline relies on, on top of `base`.
    pub fn required_limits(base: wgpu::Limits) -> wgpu::Limits {
        let push_constant_size = WgpuRenderHandle::push_constant_range().range.end;
        wgpu::Limits {
            max_push_constant_size: base.max_push_constant_size.max(push_constant_size),
            ..base
        }
    }

    /// Creates the pipeline and a `width` x `height` offscreen target.
    ///
    /// The device must have been created with [`Self::required_features`] and
    /// [`Self::required_limits`].
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: [[0.0; 4]; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Camera Bind Group Layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Chunk Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[WgpuRenderHandle::push_constant_range()],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Chunk Shader"),
            source: wgpu::ShaderSource::Wgsl(CHUNK_SHADER.into()),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Chunk Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: Texture::COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        debug!("Created chunk render pipeline with a {width}x{height} target");

        Self {
            render_pipeline,
            camera_buffer,
            camera_bind_group,
            color_target: Texture::create_render_target(device, width, height, "Chunk Color Target"),
            depth_texture: Texture::create_depth_texture(device, width, height, "Chunk Depth Texture"),
        }
    }

    /// Renders one frame of `world` seen through `camera` and submits it.
    pub fn render_frame(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        world: &World<WgpuAllocator>,
        camera: &CameraUniform,
    ) -> Result<(), RenderError> {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Chunk Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Chunk Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            let mut handle = WgpuRenderHandle::new(&mut render_pass, &self.render_pipeline);
            world.render(&mut handle)?;
        }

        queue.submit([encoder.finish()]);
        Ok(())
    }

    /// The texture frames are rendered into.
    pub fn color_target(&self) -> &wgpu::Texture {
        &self.color_target.texture
    }
}

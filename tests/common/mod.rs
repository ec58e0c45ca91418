//! Test doubles for the GPU seam.
#![allow(dead_code)]

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use cgmath::Matrix4;
use voxel_world::{GpuAllocator, GpuError, RenderError, RenderHandle, VERTEX_STRIDE_FLOATS};

/// Buffer handle handed out by `CountingAllocator`.
#[derive(Debug, PartialEq, Eq)]
pub struct TestBuffers {
    pub id: u32,
    pub vertex_floats: usize,
    pub index_count: usize,
}

/// Shared record of what an allocator did, readable after the world is dropped.
#[derive(Debug, Default)]
pub struct Ledger {
    pub created: usize,
    pub released: usize,
    pub live: HashSet<u32>,
    next_id: u32,
}

/// Allocator double that counts creations and releases and panics on double release.
#[derive(Clone, Default)]
pub struct CountingAllocator {
    ledger: Rc<RefCell<Ledger>>,
    /// Maximum number of live buffer pairs
    capacity: Option<usize>,
}

impl CountingAllocator {
    pub fn with_capacity(capacity: usize) -> Self {
        CountingAllocator {
            capacity: Some(capacity),
            ..CountingAllocator::default()
        }
    }

    pub fn ledger(&self) -> Rc<RefCell<Ledger>> {
        Rc::clone(&self.ledger)
    }

    pub fn live(&self) -> usize {
        self.ledger.borrow().live.len()
    }

    pub fn created(&self) -> usize {
        self.ledger.borrow().created
    }

    pub fn released(&self) -> usize {
        self.ledger.borrow().released
    }
}

impl GpuAllocator for CountingAllocator {
    type Buffers = TestBuffers;

    fn create_buffers(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<TestBuffers, GpuError> {
        assert_eq!(vertices.len() % VERTEX_STRIDE_FLOATS, 0, "partial vertex uploaded");
        assert!(indices.iter().all(|i| (*i as usize) < vertices.len() / VERTEX_STRIDE_FLOATS));

        let mut ledger = self.ledger.borrow_mut();
        if let Some(capacity) = self.capacity {
            if ledger.live.len() >= capacity {
                return Err(GpuError::ResourceExhausted {
                    requested: 1,
                    available: 0,
                });
            }
        }

        ledger.next_id += 1;
        let id = ledger.next_id;
        ledger.live.insert(id);
        ledger.created += 1;

        Ok(TestBuffers {
            id,
            vertex_floats: vertices.len(),
            index_count: indices.len(),
        })
    }

    fn release(&mut self, buffers: TestBuffers) {
        let mut ledger = self.ledger.borrow_mut();
        assert!(ledger.live.remove(&buffers.id), "buffers {} released twice", buffers.id);
        ledger.released += 1;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderEvent {
    Bind,
    SetMat4(String, Matrix4<f32>),
    Draw { id: u32, index_count: u32 },
}

/// Render handle double that records every call.
#[derive(Default)]
pub struct RecordingRenderHandle {
    pub events: Vec<RenderEvent>,
    /// Uniform names the handle rejects
    pub unknown_uniforms: Vec<String>,
}

impl RecordingRenderHandle {
    pub fn draws(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, RenderEvent::Draw { .. }))
            .count()
    }

    pub fn model_matrices(&self) -> Vec<Matrix4<f32>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::SetMat4(name, matrix) if name == "model" => Some(*matrix),
                _ => None,
            })
            .collect()
    }
}

impl RenderHandle for RecordingRenderHandle {
    type Buffers = TestBuffers;

    fn bind(&mut self) {
        self.events.push(RenderEvent::Bind);
    }

    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) -> Result<(), RenderError> {
        if self.unknown_uniforms.iter().any(|unknown| unknown == name) {
            return Err(RenderError::UnknownUniform(name.to_string()));
        }
        self.events.push(RenderEvent::SetMat4(name.to_string(), *value));
        Ok(())
    }

    fn draw_indexed(&mut self, buffers: &TestBuffers, index_count: u32) {
        assert_eq!(buffers.index_count, index_count as usize);
        self.events.push(RenderEvent::Draw {
            id: buffers.id,
            index_count,
        });
    }
}

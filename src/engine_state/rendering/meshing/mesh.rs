//! Mesh data structures for voxel rendering.
//!
//! A [`Mesh`] is a plain vertex list plus a triangle-list index list. Faces are
//! always emitted as quads: four vertices and six indices each.

use cgmath::Vector3;

use crate::engine_state::{rendering::Vertex, voxels::block::block_side::BlockSide};

/// Texture coordinates of a quad's four corners, in corner order.
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Two counter-clockwise triangles over a quad's four corners.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// The visible surface of a chunk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data, four per face
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices into `vertices`, six per face
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Appends the quad covering `side` of the unit voxel at chunk-local (x, y, z).
    pub fn add_face(&mut self, x: usize, y: usize, z: usize, side: BlockSide) {
        let base = self.vertices.len() as u32;
        let normal = side.normal();

        for (corner, [u, v]) in side.corners().into_iter().zip(QUAD_UVS) {
            let position = Vector3::new(
                (x + corner[0] as usize) as f32,
                (y + corner[1] as usize) as f32,
                (z + corner[2] as usize) as f32,
            );
            self.vertices.push(Vertex::new(position, normal, u, v));
        }

        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Whether the mesh has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The vertex list viewed as interleaved floats, ready for upload.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Size of the vertex and index data in bytes.
    pub fn byte_size(&self) -> u64 {
        (std::mem::size_of_val(self.vertices.as_slice())
            + std::mem::size_of_val(self.indices.as_slice())) as u64
    }
}

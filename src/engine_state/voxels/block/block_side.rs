//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block and the
//! geometry each face contributes to a mesh.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant corresponds to a specific face and is assigned a unique integer value.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let [x, y, z] = self.offset();
        Vector3::new(x as f32, y as f32, z as f32)
    }

    /// Offset from a voxel to the neighbour that shares this face.
    pub fn offset(self) -> [i32; 3] {
        match self {
            BlockSide::FRONT => [0, 0, 1],
            BlockSide::BACK => [0, 0, -1],
            BlockSide::BOTTOM => [0, -1, 0],
            BlockSide::TOP => [0, 1, 0],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::RIGHT => [1, 0, 0],
        }
    }

    /// The four corners of this face for the unit cube whose minimum corner is the origin.
    ///
    /// Corners are ordered counter-clockwise when viewed from outside the cube, starting at
    /// the corner that receives texture coordinate (0, 0). For the four side faces the second
    /// half of the list sits one unit higher, so textures are never upside down.
    pub fn corners(self) -> [[u8; 3]; 4] {
        match self {
            BlockSide::FRONT => [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]],
            BlockSide::BACK => [[1, 0, 0], [0, 0, 0], [0, 1, 0], [1, 1, 0]],
            BlockSide::BOTTOM => [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
            BlockSide::TOP => [[0, 1, 1], [1, 1, 1], [1, 1, 0], [0, 1, 0]],
            BlockSide::LEFT => [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]],
            BlockSide::RIGHT => [[1, 0, 1], [1, 0, 0], [1, 1, 0], [1, 1, 1]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn corner(c: [u8; 3]) -> Vector3<f32> {
        Vector3::new(c[0] as f32, c[1] as f32, c[2] as f32)
    }

    #[test]
    fn corners_wind_counter_clockwise_around_the_normal() {
        for side in BlockSide::all() {
            let [a, b, c, _] = side.corners().map(corner);
            let winding = (b - a).cross(c - a).normalize();
            assert_eq!(winding, side.normal(), "{side:?}");
        }
    }

    #[test]
    fn corners_lie_on_the_face_plane() {
        for side in BlockSide::all() {
            let normal = side.normal();
            let plane = if normal.x + normal.y + normal.z > 0.0 { 1.0 } else { 0.0 };
            for c in side.corners().map(corner) {
                assert_eq!(c.dot(normal).abs(), plane, "{side:?}");
            }
        }
    }
}

//! Chunk-grid coordinates.

use std::fmt;

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Position of a chunk in chunk-grid units.
///
/// One unit along x or z equals one chunk width in blocks, one unit along y equals
/// one chunk height. Used directly as the key of the loaded chunk map.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    /// Chunk index along the x axis.
    pub x: i32,
    /// Chunk index along the y axis. Streaming keeps this at 0.
    pub y: i32,
    /// Chunk index along the z axis.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        ChunkCoord { x, y, z }
    }

    /// The chunk on the streaming layer (y = 0) containing the world-space point.
    ///
    /// Uses floor division so that points with negative coordinates map to negative chunks
    /// (x = -0.5 lies in chunk -1, not chunk 0).
    pub fn containing(point: Point3<f32>, chunk_width: u32) -> Self {
        let width = chunk_width as f32;
        ChunkCoord::new(
            (point.x / width).floor() as i32,
            0,
            (point.z / width).floor() as i32,
        )
    }

    /// World-space position of this chunk's minimum corner.
    pub fn origin(self, chunk_width: u32, chunk_height: u32) -> Vector3<f32> {
        Vector3::new(
            (self.x as i64 * chunk_width as i64) as f32,
            (self.y as i64 * chunk_height as i64) as f32,
            (self.z as i64 * chunk_width as i64) as f32,
        )
    }

    /// Horizontal Chebyshev distance, the metric that decides whether a chunk is in range.
    pub fn horizontal_distance(self, other: ChunkCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<Point3<i32>> for ChunkCoord {
    fn from(point: Point3<i32>) -> Self {
        ChunkCoord::new(point.x, point.y, point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_coordinates() {
        assert_eq!(ChunkCoord::containing(Point3::new(0.0, 0.0, 0.0), 16), ChunkCoord::new(0, 0, 0));
        assert_eq!(ChunkCoord::containing(Point3::new(15.9, 3.0, 15.9), 16), ChunkCoord::new(0, 0, 0));
        assert_eq!(ChunkCoord::containing(Point3::new(16.0, 0.0, -0.5), 16), ChunkCoord::new(1, 0, -1));
        assert_eq!(ChunkCoord::containing(Point3::new(-16.0, 0.0, -16.01), 16), ChunkCoord::new(-1, 0, -2));
    }

    #[test]
    fn distance_is_chebyshev_and_ignores_height() {
        let center = ChunkCoord::new(0, 0, 0);
        assert_eq!(center.horizontal_distance(ChunkCoord::new(3, 0, -2)), 3);
        assert_eq!(center.horizontal_distance(ChunkCoord::new(-4, 9, 4)), 4);
    }

    #[test]
    fn origin_scales_by_chunk_dimensions() {
        assert_eq!(ChunkCoord::new(-2, 1, 3).origin(16, 64), Vector3::new(-32.0, 64.0, 48.0));
    }
}

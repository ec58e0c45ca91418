//! # Perlin Noise Module
//!
//! Deterministic 3D gradient noise ("improved" Perlin noise) over a fixed
//! permutation table. The table never changes at runtime, so the same input always
//! produces the same output, across runs and across threads.
//!
//! The generator implements `noise::NoiseFn<f64, 3>`, which lets terrain generation
//! accept it interchangeably with the sources shipped by the `noise` crate.

use noise::NoiseFn;

/// Reference permutation of 0..=255.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225,
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148,
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32,
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122,
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54,
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169,
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64,
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213,
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9,
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104,
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241,
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93,
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// A shared instance, usable from any thread.
pub static PERLIN: PerlinNoise = PerlinNoise::new();

/// Samples [`PERLIN`] at (x, y, z). Always within [-1, 1].
pub fn noise(x: f64, y: f64, z: f64) -> f64 {
    PERLIN.noise(x, y, z)
}

/// 3D gradient noise with a fixed permutation table.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    /// The permutation repeated twice, so `p[i + 1]` never needs wrapping.
    p: [u8; 512],
}

impl PerlinNoise {
    /// Builds the generator from the reference permutation.
    pub const fn new() -> Self {
        let mut p = [0u8; 512];
        let mut i = 0;
        while i < 512 {
            p[i] = PERMUTATION[i & 255];
            i += 1;
        }
        PerlinNoise { p }
    }

    /// Noise value at (x, y, z), in [-1, 1]. Integer lattice points map to 0.
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let (x0, y0, z0) = (x.floor(), y.floor(), z.floor());

        // Lattice cell, wrapped onto the table
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let zi = (z0 as i64 & 255) as usize;

        let (x, y, z) = (x - x0, y - y0, z - z0);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let p = &self.p;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        let value = lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(u, grad(p[ab], x, y - 1.0, z), grad(p[bb], x - 1.0, y - 1.0, z)),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        );

        value.clamp(-1.0, 1.0)
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        PerlinNoise::new()
    }
}

impl NoiseFn<f64, 3> for PerlinNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.noise(point[0], point[1], point[2])
    }
}

/// 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset with one of 12 cube-edge gradients picked by `hash`.
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_points_are_zero() {
        for (x, y, z) in [(0.0, 0.0, 0.0), (3.0, -7.0, 12.0), (255.0, 256.0, -1.0)] {
            assert_eq!(noise(x, y, z), 0.0);
        }
    }

    #[test]
    fn noise_fn_matches_inherent_method() {
        let perlin = PerlinNoise::new();
        let point = [1.25, -3.5, 0.75];
        assert_eq!(perlin.get(point), perlin.noise(1.25, -3.5, 0.75));
    }

    #[test]
    fn varies_between_lattice_points() {
        let samples: Vec<f64> = (0..32).map(|i| noise(i as f64 * 0.37 + 0.1, 0.4, 0.0)).collect();
        assert!(samples.iter().any(|s| *s > 0.05));
        assert!(samples.iter().any(|s| *s < -0.05));
    }

    #[test]
    fn fade_is_smooth_at_cell_edges() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }
}

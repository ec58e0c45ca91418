//! # Camera
//!
//! A fixed camera for rendering frames of the world: a position, a look direction
//! given as yaw and pitch, and a perspective projection.
//!
//! ## Key Components
//! - `Camera`: The camera's position and orientation in 3D space
//! - `Projection`: Perspective projection settings
//! - `CameraUniform`: Packed view-projection matrix for the shader

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// Scales the Z coordinate from [-1, 1] to [-0.5, 0.5], then translates it to [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A camera in world space.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians; 0 looks along +X
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians, clamped short of straight up/down
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Position of the camera in world space
    /// * `yaw` - Horizontal rotation around the Y axis
    /// * `pitch` - Vertical rotation around the X axis
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let pitch: Rad<f32> = pitch.into();
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: Rad(pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2)),
        }
    }

    /// Normalized direction the camera looks in.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Calculates the view matrix, transforming world coordinates to camera space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection for a `width` x `height` viewport.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera data as laid out in the shader's uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Packs the view-projection of `camera` seen through `projection`.
    pub fn new(camera: &Camera, projection: &Projection) -> Self {
        Self {
            view_proj: (projection.calc_matrix() * camera.calc_matrix()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ahead_lands_inside_clip_space() {
        let camera = Camera::new(Point3::new(0.0, 10.0, 0.0), Deg(0.0), Deg(0.0));
        let projection = Projection::new(800, 600, Deg(70.0), 0.1, 500.0);
        let view_proj = projection.calc_matrix() * camera.calc_matrix();

        let clip = view_proj * Vector4::new(20.0, 10.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);

        // Behind the camera
        let behind = view_proj * Vector4::new(-20.0, 10.0, 0.0, 1.0);
        assert!(behind.w < 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(120.0));
        assert!(camera.pitch.0 < FRAC_PI_2);
        assert!(camera.forward().y < 1.0);
    }
}

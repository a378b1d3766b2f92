//! # First-Person Camera
//!
//! Yaw/pitch camera for free-flying first-person views.
//!
//! ## Design Principles
//! - **Backend-agnostic**: produces plain matrices; the render callback loads
//!   the projection and hands the view to the renderer
//! - **Degrees at the API**: angles are stored and accepted in degrees, the
//!   same unit the device's `rotate` call takes
//! - **OpenGL conventions**: right-handed, Y-up, camera looks down -Z at
//!   zero yaw and pitch, clip space depth in -1..1

use crate::foundation::math::{utils, Mat4, Vec3};

/// Pitch limit keeping the view from flipping over the poles
pub const MAX_PITCH_DEGREES: f32 = 89.0;

/// Narrowest and widest allowed field of view
pub const FOV_RANGE_DEGREES: (f32, f32) = (1.0, 120.0);

/// First-person camera with yaw/pitch orientation
///
/// # Coordinate System
/// - X+ = right
/// - Y+ = up
/// - Z- = forward at `yaw = 0`, `pitch = 0`
///
/// Yaw turns counter-clockwise seen from above (positive yaw looks left).
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    /// Eye position in world space
    pub position: Vec3,

    /// Heading in degrees
    pub yaw: f32,

    /// Elevation in degrees, clamped to ±[`MAX_PITCH_DEGREES`]
    pub pitch: f32,

    /// Vertical field of view in degrees
    pub fov: f32,

    /// Viewport width / height
    pub aspect: f32,

    /// Near clipping plane distance (> 0)
    pub near: f32,

    /// Far clipping plane distance (> near)
    pub far: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 640.0 / 480.0)
    }
}

impl FirstPersonCamera {
    /// Camera at `position` looking down -Z with a 60° field of view
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov: 60.0,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        Vec3::new(
            -yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
    }

    /// Unit vector to the camera's right, parallel to the ground
    pub fn right(&self) -> Vec3 {
        let yaw = utils::deg_to_rad(self.yaw);
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    /// Move relative to the current heading
    ///
    /// `forward` follows the view direction including pitch, `right` strafes
    /// along the ground, `up` moves along world Y.
    pub fn move_local(&mut self, forward: f32, right: f32, up: f32) {
        self.position += self.forward() * forward + self.right() * right + Vec3::y() * up;
    }

    /// Turn by yaw/pitch deltas in degrees
    ///
    /// Pitch is clamped; yaw wraps into 0..360.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw = (self.yaw + yaw_delta).rem_euclid(360.0);
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }

    /// Change the field of view, clamped to [`FOV_RANGE_DEGREES`]
    pub fn zoom(&mut self, fov_delta: f32) {
        self.fov = (self.fov + fov_delta).clamp(FOV_RANGE_DEGREES.0, FOV_RANGE_DEGREES.1);
    }

    /// Update the aspect ratio from a framebuffer size; zero sizes are ignored
    #[allow(clippy::cast_precision_loss)]
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> Mat4 {
        let eye = nalgebra::Point3::from(self.position);
        let target = eye + self.forward();
        Mat4::look_at_rh(&eye, &target, &Vec3::y())
    }

    /// Perspective projection with GL clip-space conventions
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, utils::deg_to_rad(self.fov), self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = FirstPersonCamera::default();
        assert_relative_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.right(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = FirstPersonCamera::default();
        camera.rotate(0.0, 500.0);
        assert_relative_eq!(camera.pitch, MAX_PITCH_DEGREES);
        camera.rotate(-370.0, -1000.0);
        assert_relative_eq!(camera.pitch, -MAX_PITCH_DEGREES);
        assert_relative_eq!(camera.yaw, 350.0, epsilon = 1e-4);
    }

    #[test]
    fn test_move_local_follows_yaw() {
        let mut camera = FirstPersonCamera::default();
        camera.rotate(90.0, 0.0);
        camera.move_local(2.0, 0.0, 0.0);
        assert_relative_eq!(camera.position, Vec3::new(-2.0, 0.0, 0.0), epsilon = 1e-5);

        camera.move_local(0.0, 0.0, 1.5);
        assert_relative_eq!(camera.position.y, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_moves_world_opposite_to_eye() {
        let camera = FirstPersonCamera::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let origin = camera.view_matrix().transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(origin.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_and_viewport() {
        let mut camera = FirstPersonCamera::default();
        camera.zoom(-100.0);
        assert_relative_eq!(camera.fov, FOV_RANGE_DEGREES.0);
        camera.set_viewport(800, 400);
        assert_relative_eq!(camera.aspect, 2.0);
        camera.set_viewport(0, 400);
        assert_relative_eq!(camera.aspect, 2.0);
    }
}

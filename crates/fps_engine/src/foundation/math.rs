//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of helpers the renderer and
//! camera need.

pub use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (homogeneous positions, RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type, column-major like fixed-function GL expects
pub type Mat4 = Matrix4<f32>;

/// Common math utilities
pub mod utils {
    use super::{Mat4, Unit, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Rotation matrix of `angle_degrees` about `axis`
    ///
    /// A zero-length axis yields the identity instead of NaNs.
    pub fn rotation_about(angle_degrees: f32, axis: &Vec3) -> Mat4 {
        if approx::abs_diff_eq!(axis.norm(), 0.0) {
            return Mat4::identity();
        }
        Mat4::from_axis_angle(&Unit::new_normalize(*axis), deg_to_rad(angle_degrees))
    }

    /// Model matrix composed as translate × rotate × scale
    pub fn model_matrix(translation: &Vec3, angle_degrees: f32, axis: &Vec3, scale: &Vec3) -> Mat4 {
        Mat4::new_translation(translation)
            * rotation_about(angle_degrees, axis)
            * Mat4::new_nonuniform_scaling(scale)
    }
}

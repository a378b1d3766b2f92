//! Graphics device abstraction
//!
//! The renderer and user render callbacks draw through [`GraphicsDevice`], an
//! immediate-mode command surface shaped after the fixed-function pipeline:
//! a transform stack, an attribute stack, a current color and polygon mode,
//! and unindexed vertex arrays.

use crate::foundation::math::{Mat4, Vec3};

/// Rasterization mode for polygons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Vertices only
    Point,
    /// Edges only (wireframe)
    Line,
    /// Filled faces
    #[default]
    Fill,
}

/// How consecutive vertices form primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    /// Every three vertices form a triangle
    #[default]
    Triangles,
    /// Every four vertices form a quad
    Quads,
    /// Every two vertices form a line segment
    Lines,
}

impl Topology {
    /// Vertices consumed by one primitive
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Triangles => 3,
            Self::Quads => 4,
            Self::Lines => 2,
        }
    }
}

/// Immediate-mode graphics device
///
/// Angles are in degrees. Transform calls post-multiply the current matrix,
/// so the last call issued is the first applied to vertices.
pub trait GraphicsDevice {
    /// Color used by [`GraphicsDevice::clear`]
    fn set_clear_color(&mut self, rgba: [f32; 4]);

    /// Clear the color and depth buffers
    fn clear(&mut self);

    /// Viewport in framebuffer pixels
    fn set_viewport(&mut self, width: i32, height: i32);

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool);

    /// Replace the projection matrix
    fn load_projection(&mut self, projection: &Mat4);

    /// Save the current model-view matrix
    fn push_transform(&mut self);

    /// Restore the last saved model-view matrix
    fn pop_transform(&mut self);

    /// Reset the model-view matrix to identity
    fn load_identity(&mut self);

    /// Post-multiply the model-view matrix
    fn multiply_transform(&mut self, matrix: &Mat4);

    /// Post-multiply a translation
    fn translate(&mut self, offset: Vec3);

    /// Post-multiply a rotation of `angle_degrees` about `axis`
    fn rotate(&mut self, angle_degrees: f32, axis: Vec3);

    /// Post-multiply a non-uniform scale
    fn scale(&mut self, factors: Vec3);

    /// Save color and polygon mode
    fn push_attributes(&mut self);

    /// Restore the last saved color and polygon mode
    fn pop_attributes(&mut self);

    /// Current drawing color
    fn set_color(&mut self, rgba: [f32; 4]);

    /// Current polygon mode for both faces
    fn set_polygon_mode(&mut self, mode: PolygonMode);

    /// Draw unindexed vertex data; `normals` is either empty or as long as `vertices`
    fn draw_arrays(&mut self, vertices: &[[f32; 3]], normals: &[[f32; 3]], topology: Topology);
}

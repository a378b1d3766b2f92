//! Drawable objects
//!
//! Objects live in an application-owned [`ObjectArena`]; the renderer only
//! remembers which keys to draw. Mutating an object through the arena is
//! visible on the next draw pass without re-registering it.

use slotmap::SlotMap;

use super::backend::PolygonMode;
use super::definition::DefinitionId;
use crate::foundation::math::{utils, Mat4, Vec3, Vec4};

slotmap::new_key_type! {
    /// Handle to a [`RenderableObject`] in an [`ObjectArena`]
    pub struct ObjectKey;
}

/// Storage for drawable objects, owned by the application
pub type ObjectArena = SlotMap<ObjectKey, RenderableObject>;

/// Which geometry an object draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectType {
    /// The built-in unit cube
    #[default]
    Cube,
    /// A registered render definition, looked up by `definition_id`
    Custom,
}

/// Per-object draw state
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableObject {
    /// World position; `w` is carried but not used for translation
    pub position: Vec4,

    /// RGBA color, components in 0..=1
    pub color: Vec4,

    /// Per-axis scale
    pub scale: Vec3,

    /// Rotation angle in degrees
    pub rotation_angle: f32,

    /// Rotation axis; a zero axis means no rotation
    pub rotation_axis: Vec3,

    /// Geometry source
    pub object_type: ObjectType,

    /// Definition to draw when `object_type` is [`ObjectType::Custom`]
    pub definition_id: Option<DefinitionId>,

    /// Rasterization mode for this object
    pub polygon_mode: PolygonMode,
}

impl Default for RenderableObject {
    fn default() -> Self {
        Self::cube()
    }
}

impl RenderableObject {
    /// White unit cube at the origin
    pub fn cube() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation_angle: 0.0,
            rotation_axis: Vec3::new(0.0, 1.0, 0.0),
            object_type: ObjectType::Cube,
            definition_id: None,
            polygon_mode: PolygonMode::Fill,
        }
    }

    /// Object drawing the definition `id`
    pub fn custom(id: DefinitionId) -> Self {
        Self {
            object_type: ObjectType::Custom,
            definition_id: Some(id),
            ..Self::cube()
        }
    }

    /// Place the object
    #[must_use]
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec4::new(x, y, z, 1.0);
        self
    }

    /// Set the color
    #[must_use]
    pub fn with_color(mut self, rgba: [f32; 4]) -> Self {
        self.color = Vec4::from(rgba);
        self
    }

    /// Set the scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the rotation
    #[must_use]
    pub fn with_rotation(mut self, angle_degrees: f32, axis: Vec3) -> Self {
        self.rotation_angle = angle_degrees;
        self.rotation_axis = axis;
        self
    }

    /// Draw edges only
    #[must_use]
    pub const fn wireframe(mut self) -> Self {
        self.polygon_mode = PolygonMode::Line;
        self
    }

    /// Translation part of the position
    pub fn translation(&self) -> Vec3 {
        self.position.xyz()
    }

    /// Color as a plain array
    pub fn rgba(&self) -> [f32; 4] {
        self.color.into()
    }

    /// Model matrix: translate × rotate × scale
    pub fn model_matrix(&self) -> Mat4 {
        utils::model_matrix(
            &self.translation(),
            self.rotation_angle,
            &self.rotation_axis,
            &self.scale,
        )
    }
}

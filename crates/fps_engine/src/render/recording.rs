//! Command-recording graphics device
//!
//! [`RecordingDevice`] keeps the same matrix and attribute stacks a
//! fixed-function pipeline would, and appends every call to a command log.
//! Draw commands capture the fully evaluated model-view matrix and the
//! attributes in effect, so tests can assert on what would reach the screen.

use super::backend::{GraphicsDevice, PolygonMode, Topology};
use crate::foundation::math::{utils, Mat4, Vec3};

/// Snapshot of one `draw_arrays` call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Model-view matrix at draw time
    pub model_view: Mat4,
    /// Current color
    pub color: [f32; 4],
    /// Current polygon mode
    pub polygon_mode: PolygonMode,
    /// Primitive topology
    pub topology: Topology,
    /// Number of vertices submitted
    pub vertex_count: usize,
    /// Whether normals accompanied the vertices
    pub has_normals: bool,
}

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `set_clear_color`
    ClearColor([f32; 4]),
    /// `clear`
    Clear,
    /// `set_viewport`
    Viewport(i32, i32),
    /// `set_depth_test`
    DepthTest(bool),
    /// `load_projection`
    Projection(Mat4),
    /// `push_transform`
    PushTransform,
    /// `pop_transform`
    PopTransform,
    /// `load_identity`
    LoadIdentity,
    /// `multiply_transform`
    MultiplyTransform(Mat4),
    /// `translate`
    Translate(Vec3),
    /// `rotate`
    Rotate(f32, Vec3),
    /// `scale`
    Scale(Vec3),
    /// `push_attributes`
    PushAttributes,
    /// `pop_attributes`
    PopAttributes,
    /// `set_color`
    Color([f32; 4]),
    /// `set_polygon_mode`
    PolygonMode(PolygonMode),
    /// `draw_arrays`
    Draw(DrawCall),
    /// Buffer swap, recorded by the headless platform
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Attributes {
    color: [f32; 4],
    polygon_mode: PolygonMode,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            polygon_mode: PolygonMode::Fill,
        }
    }
}

/// Graphics device that records instead of rasterizing
#[derive(Debug, Clone)]
pub struct RecordingDevice {
    commands: Vec<DrawCommand>,
    model_view: Mat4,
    transform_stack: Vec<Mat4>,
    attributes: Attributes,
    attribute_stack: Vec<Attributes>,
    projection: Mat4,
    unbalanced_pops: usize,
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDevice {
    /// Empty device with identity matrices and white fill
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            model_view: Mat4::identity(),
            transform_stack: Vec::new(),
            attributes: Attributes::default(),
            attribute_stack: Vec::new(),
            projection: Mat4::identity(),
            unbalanced_pops: 0,
        }
    }

    /// Every command recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Only the draw calls
    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Draw(call) => Some(call),
            _ => None,
        })
    }

    /// Number of buffer swaps recorded
    pub fn present_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Present))
            .count()
    }

    /// Current model-view matrix
    pub const fn model_view(&self) -> &Mat4 {
        &self.model_view
    }

    /// Current projection matrix
    pub const fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Depth of the transform stack
    pub fn transform_depth(&self) -> usize {
        self.transform_stack.len()
    }

    /// Depth of the attribute stack
    pub fn attribute_depth(&self) -> usize {
        self.attribute_stack.len()
    }

    /// Pops issued against an empty stack
    pub const fn unbalanced_pops(&self) -> usize {
        self.unbalanced_pops
    }

    /// Record a buffer swap
    pub fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}

impl GraphicsDevice for RecordingDevice {
    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.commands.push(DrawCommand::ClearColor(rgba));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_viewport(&mut self, width: i32, height: i32) {
        self.commands.push(DrawCommand::Viewport(width, height));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.commands.push(DrawCommand::DepthTest(enabled));
    }

    fn load_projection(&mut self, projection: &Mat4) {
        self.projection = *projection;
        self.commands.push(DrawCommand::Projection(*projection));
    }

    fn push_transform(&mut self) {
        self.transform_stack.push(self.model_view);
        self.commands.push(DrawCommand::PushTransform);
    }

    fn pop_transform(&mut self) {
        match self.transform_stack.pop() {
            Some(saved) => self.model_view = saved,
            None => {
                log::warn!("pop_transform on empty stack");
                self.unbalanced_pops += 1;
            }
        }
        self.commands.push(DrawCommand::PopTransform);
    }

    fn load_identity(&mut self) {
        self.model_view = Mat4::identity();
        self.commands.push(DrawCommand::LoadIdentity);
    }

    fn multiply_transform(&mut self, matrix: &Mat4) {
        self.model_view *= matrix;
        self.commands.push(DrawCommand::MultiplyTransform(*matrix));
    }

    fn translate(&mut self, offset: Vec3) {
        self.model_view *= Mat4::new_translation(&offset);
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, angle_degrees: f32, axis: Vec3) {
        self.model_view *= utils::rotation_about(angle_degrees, &axis);
        self.commands.push(DrawCommand::Rotate(angle_degrees, axis));
    }

    fn scale(&mut self, factors: Vec3) {
        self.model_view *= Mat4::new_nonuniform_scaling(&factors);
        self.commands.push(DrawCommand::Scale(factors));
    }

    fn push_attributes(&mut self) {
        self.attribute_stack.push(self.attributes);
        self.commands.push(DrawCommand::PushAttributes);
    }

    fn pop_attributes(&mut self) {
        match self.attribute_stack.pop() {
            Some(saved) => self.attributes = saved,
            None => {
                log::warn!("pop_attributes on empty stack");
                self.unbalanced_pops += 1;
            }
        }
        self.commands.push(DrawCommand::PopAttributes);
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.attributes.color = rgba;
        self.commands.push(DrawCommand::Color(rgba));
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.attributes.polygon_mode = mode;
        self.commands.push(DrawCommand::PolygonMode(mode));
    }

    fn draw_arrays(&mut self, vertices: &[[f32; 3]], normals: &[[f32; 3]], topology: Topology) {
        self.commands.push(DrawCommand::Draw(DrawCall {
            model_view: self.model_view,
            color: self.attributes.color,
            polygon_mode: self.attributes.polygon_mode,
            topology,
            vertex_count: vertices.len(),
            has_normals: !normals.is_empty(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_stack_restores() {
        let mut device = RecordingDevice::new();
        device.push_transform();
        device.translate(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(device.model_view()[(0, 3)], 1.0);
        device.pop_transform();
        assert_eq!(*device.model_view(), Mat4::identity());
        assert_eq!(device.transform_depth(), 0);
        assert_eq!(device.unbalanced_pops(), 0);
    }

    #[test]
    fn test_draw_captures_state() {
        let mut device = RecordingDevice::new();
        device.push_attributes();
        device.set_color([1.0, 0.0, 0.0, 1.0]);
        device.set_polygon_mode(PolygonMode::Line);
        device.scale(Vec3::new(2.0, 2.0, 2.0));
        device.draw_arrays(&[[0.0; 3]; 6], &[], Topology::Lines);
        device.pop_attributes();

        let call = device.draw_calls().next().unwrap().clone();
        assert_eq!(call.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(call.polygon_mode, PolygonMode::Line);
        assert_eq!(call.vertex_count, 6);
        assert!(!call.has_normals);
        assert_relative_eq!(call.model_view[(0, 0)], 2.0);

        device.draw_arrays(&[[0.0; 3]; 3], &[[0.0; 3]; 3], Topology::Triangles);
        let after = device.draw_calls().last().unwrap();
        assert_eq!(after.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(after.polygon_mode, PolygonMode::Fill);
    }

    #[test]
    fn test_unbalanced_pop_is_counted() {
        let mut device = RecordingDevice::new();
        device.pop_transform();
        device.pop_attributes();
        assert_eq!(device.unbalanced_pops(), 2);
    }
}

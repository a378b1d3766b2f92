//! Immediate-mode object renderer
//!
//! Keeps the ordered list of live objects and the registered custom
//! geometry, and turns them into device calls once per frame.

use std::collections::HashMap;

use super::backend::{GraphicsDevice, PolygonMode, Topology};
use super::definition::{DefinitionId, RenderDefinition};
use super::object::{ObjectArena, ObjectKey, ObjectType, RenderableObject};
use super::primitives::{CUBE_NORMALS, CUBE_VERTICES};
use super::{RenderError, RenderResult};
use crate::foundation::collections::DynamicArray;
use crate::foundation::math::Mat4;

/// Geometry resolved for one object
#[derive(Debug, Clone, Copy)]
pub struct Geometry<'a> {
    /// Vertex positions
    pub vertices: &'a [[f32; 3]],
    /// Vertex normals
    pub normals: &'a [[f32; 3]],
    /// Primitive topology
    pub topology: Topology,
}

/// Outcome of one draw pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    /// Objects submitted to the device
    pub drawn: usize,
    /// Objects skipped for missing or empty geometry
    pub skipped: usize,
}

/// Live-object list plus definition registry
#[derive(Debug)]
pub struct Renderer {
    initialized: bool,
    live: DynamicArray<ObjectKey>,
    live_index: HashMap<ObjectKey, usize>,
    definitions: HashMap<DefinitionId, RenderDefinition>,
    view: Mat4,
    last_stats: DrawStats,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Uninitialized renderer
    pub fn new() -> Self {
        Self {
            initialized: false,
            live: DynamicArray::new(),
            live_index: HashMap::new(),
            definitions: HashMap::new(),
            view: Mat4::identity(),
            last_stats: DrawStats::default(),
        }
    }

    /// Allocate the object list and definition registry
    pub fn init(&mut self) -> RenderResult<()> {
        if self.initialized {
            log::error!("renderer already initialized");
            return Err(RenderError::AlreadyInitialized);
        }

        log::debug!("initializing renderer...");
        self.live.init().map_err(|e| {
            log::error!("failed to allocate memory for object array");
            e
        })?;
        self.live_index.clear();
        self.definitions.clear();
        self.initialized = true;
        log::debug!("renderer initialization complete");
        Ok(())
    }

    /// Release the object list and every definition; repeat calls do nothing
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        log::debug!("shutting down renderer...");
        self.live.destroy_deep();
        self.live_index.clear();
        self.definitions.clear();
        self.view = Mat4::identity();
        self.initialized = false;
        log::debug!("renderer shutdown complete");
    }

    /// Whether [`Renderer::init`] has run
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ensure_initialized(&self) -> RenderResult<()> {
        if self.initialized {
            Ok(())
        } else {
            log::error!("renderer is not initialized");
            Err(RenderError::NotInitialized)
        }
    }

    /// Append an object to the draw list
    pub fn add_object(&mut self, key: ObjectKey) -> RenderResult<()> {
        self.ensure_initialized()?;
        if self.live_index.contains_key(&key) {
            return Err(RenderError::DuplicateObject(key));
        }
        self.live.push(key)?;
        self.live_index.insert(key, self.live.len() - 1);
        Ok(())
    }

    /// Take an object off the draw list
    ///
    /// The last object moves into the freed slot, so draw order is only
    /// preserved for objects added before the removed one.
    pub fn remove_object(&mut self, key: ObjectKey) -> RenderResult<()> {
        self.ensure_initialized()?;
        let Some(&idx) = self.live_index.get(&key) else {
            return Err(RenderError::UnknownObject(key));
        };

        // array first; the index map only changes once the array has
        let moved = self.live.pop()?;
        if let Some(moved) = moved.filter(|moved| *moved != key) {
            self.live.set(idx, Some(moved))?;
            self.live_index.insert(moved, idx);
        }
        self.live_index.remove(&key);
        Ok(())
    }

    /// Whether `key` is on the draw list
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.live_index.contains_key(&key)
    }

    /// Number of objects on the draw list
    pub const fn object_count(&self) -> usize {
        self.live.len()
    }

    /// Keys in draw order
    pub fn objects(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.live.iter().flatten().copied()
    }

    /// Register custom geometry; the renderer takes ownership
    pub fn add_definition(&mut self, definition: RenderDefinition) -> RenderResult<()> {
        self.ensure_initialized()?;
        let id = definition.id();
        if self.definitions.contains_key(&id) {
            log::error!("definition {id} is already registered");
            return Err(RenderError::DuplicateDefinition(id));
        }
        log::debug!("registered {id} ({} vertices)", definition.vertex_count());
        self.definitions.insert(id, definition);
        Ok(())
    }

    /// Unregister custom geometry, handing it back
    pub fn remove_definition(&mut self, id: DefinitionId) -> RenderResult<RenderDefinition> {
        self.ensure_initialized()?;
        self.definitions
            .remove(&id)
            .ok_or(RenderError::UnknownDefinition(id))
    }

    /// Registered definition by id
    pub fn definition(&self, id: DefinitionId) -> Option<&RenderDefinition> {
        self.definitions.get(&id)
    }

    /// Camera view matrix applied at the start of each pass
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// Current view matrix
    pub const fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Statistics from the most recent [`Renderer::draw_all`]
    pub const fn last_frame_stats(&self) -> DrawStats {
        self.last_stats
    }

    /// Geometry an object would draw with
    ///
    /// Built-in types win; otherwise the object's definition id is looked up.
    pub fn resolve_geometry(&self, object: &RenderableObject) -> Option<Geometry<'_>> {
        if object.object_type == ObjectType::Cube {
            return Some(Geometry {
                vertices: &CUBE_VERTICES,
                normals: &CUBE_NORMALS,
                topology: Topology::Triangles,
            });
        }

        object
            .definition_id
            .and_then(|id| self.definitions.get(&id))
            .map(|def| Geometry {
                vertices: def.vertices(),
                normals: def.normals(),
                topology: def.topology(),
            })
    }

    /// Draw every live object in list order
    pub fn draw_all(&mut self, objects: &ObjectArena, device: &mut dyn GraphicsDevice) -> DrawStats {
        let mut stats = DrawStats::default();
        if !self.initialized {
            log::error!("draw_all called on an uninitialized renderer");
            self.last_stats = stats;
            return stats;
        }

        device.push_transform();
        device.load_identity();
        device.multiply_transform(&self.view);
        device.set_polygon_mode(PolygonMode::Fill);

        for key in self.live.iter().flatten() {
            let Some(object) = objects.get(*key) else {
                log::warn!("object {key:?} is no longer in the arena");
                stats.skipped += 1;
                continue;
            };
            let Some(geometry) = self.resolve_geometry(object) else {
                log::warn!("no geometry for object {key:?} ({:?})", object.definition_id);
                stats.skipped += 1;
                continue;
            };
            if geometry.vertices.is_empty() {
                log::warn!("object {key:?} has zero vertices");
                stats.skipped += 1;
                continue;
            }

            device.push_transform();
            device.push_attributes();
            device.set_polygon_mode(object.polygon_mode);
            device.set_color(object.rgba());
            device.translate(object.translation());
            device.rotate(object.rotation_angle, object.rotation_axis);
            device.scale(object.scale);
            device.draw_arrays(geometry.vertices, geometry.normals, geometry.topology);
            device.pop_attributes();
            device.pop_transform();
            stats.drawn += 1;
        }

        device.pop_transform();
        self.last_stats = stats;
        stats
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::primitives::CUBE_VERTEX_COUNT;
    use crate::render::recording::{DrawCommand, RecordingDevice};
    use approx::assert_relative_eq;

    fn renderer() -> Renderer {
        let mut renderer = Renderer::new();
        renderer.init().unwrap();
        renderer
    }

    fn pyramid(id: u32) -> RenderDefinition {
        RenderDefinition::from_triangles(
            DefinitionId(id),
            vec![
                [0.0, 1.0, 0.0],
                [-1.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_init_twice_fails() {
        let mut renderer = renderer();
        assert_eq!(renderer.init(), Err(RenderError::AlreadyInitialized));
    }

    #[test]
    fn test_operations_require_init() {
        let mut renderer = Renderer::new();
        let mut arena = ObjectArena::with_key();
        let key = arena.insert(RenderableObject::cube());
        assert_eq!(renderer.add_object(key), Err(RenderError::NotInitialized));
        assert_eq!(renderer.add_definition(pyramid(1)), Err(RenderError::NotInitialized));
    }

    #[test]
    fn test_draw_sequence_for_cube() {
        let mut renderer = renderer();
        let mut arena = ObjectArena::with_key();
        let key = arena.insert(
            RenderableObject::cube()
                .at(1.0, 2.0, 3.0)
                .with_color([1.0, 0.0, 0.0, 1.0])
                .with_rotation(90.0, Vec3::new(0.0, 1.0, 0.0)),
        );
        renderer.add_object(key).unwrap();

        let mut device = RecordingDevice::new();
        let stats = renderer.draw_all(&arena, &mut device);
        assert_eq!(stats, DrawStats { drawn: 1, skipped: 0 });

        let commands = device.commands();
        assert_eq!(commands[0], DrawCommand::PushTransform);
        assert_eq!(commands[1], DrawCommand::LoadIdentity);
        assert_eq!(commands[2], DrawCommand::MultiplyTransform(Mat4::identity()));
        assert_eq!(commands[3], DrawCommand::PolygonMode(PolygonMode::Fill));
        assert_eq!(
            &commands[4..10],
            &[
                DrawCommand::PushTransform,
                DrawCommand::PushAttributes,
                DrawCommand::PolygonMode(PolygonMode::Fill),
                DrawCommand::Color([1.0, 0.0, 0.0, 1.0]),
                DrawCommand::Translate(Vec3::new(1.0, 2.0, 3.0)),
                DrawCommand::Rotate(90.0, Vec3::new(0.0, 1.0, 0.0)),
            ]
        );
        assert_eq!(commands[10], DrawCommand::Scale(Vec3::new(1.0, 1.0, 1.0)));
        assert!(matches!(&commands[11], DrawCommand::Draw(call) if call.vertex_count == 36));
        assert_eq!(
            &commands[12..],
            &[
                DrawCommand::PopAttributes,
                DrawCommand::PopTransform,
                DrawCommand::PopTransform,
            ]
        );
        assert_eq!(device.transform_depth(), 0);
        assert_eq!(device.attribute_depth(), 0);
    }

    #[test]
    fn test_view_matrix_reaches_draws() {
        let mut renderer = renderer();
        let mut arena = ObjectArena::with_key();
        let key = arena.insert(RenderableObject::cube());
        renderer.add_object(key).unwrap();
        renderer.set_view(Mat4::new_translation(&Vec3::new(0.0, 0.0, -5.0)));

        let mut device = RecordingDevice::new();
        renderer.draw_all(&arena, &mut device);
        let call = device.draw_calls().next().unwrap();
        assert_relative_eq!(call.model_view[(2, 3)], -5.0);
    }

    #[test]
    fn test_custom_geometry_resolution() {
        let mut renderer = renderer();
        renderer.add_definition(pyramid(7)).unwrap();

        let mut arena = ObjectArena::with_key();
        let found = arena.insert(RenderableObject::custom(DefinitionId(7)).wireframe());
        let missing = arena.insert(RenderableObject::custom(DefinitionId(8)));
        let cube = arena.insert(RenderableObject::cube());
        for key in [found, missing, cube] {
            renderer.add_object(key).unwrap();
        }

        let mut device = RecordingDevice::new();
        let stats = renderer.draw_all(&arena, &mut device);
        assert_eq!(stats, DrawStats { drawn: 2, skipped: 1 });

        let calls: Vec<_> = device.draw_calls().collect();
        assert_eq!(calls[0].vertex_count, 6);
        assert_eq!(calls[0].polygon_mode, PolygonMode::Line);
        assert_eq!(calls[1].vertex_count, 36);
        assert_eq!(calls[1].polygon_mode, PolygonMode::Fill);
    }

    #[test]
    fn test_cube_ignores_registered_definition() {
        let mut renderer = renderer();
        renderer.add_definition(pyramid(7)).unwrap();

        let mut arena = ObjectArena::with_key();
        let mut cube = RenderableObject::cube();
        cube.definition_id = Some(DefinitionId(7));
        let key = arena.insert(cube);
        renderer.add_object(key).unwrap();

        let geometry = renderer.resolve_geometry(&arena[key]).unwrap();
        assert_eq!(geometry.vertices.len(), CUBE_VERTEX_COUNT);

        let mut device = RecordingDevice::new();
        renderer.draw_all(&arena, &mut device);
        let counts: Vec<_> = device.draw_calls().map(|call| call.vertex_count).collect();
        assert_eq!(counts, vec![CUBE_VERTEX_COUNT]);
    }

    #[test]
    fn test_empty_definition_is_skipped() {
        let mut renderer = renderer();
        let empty = RenderDefinition::new(DefinitionId(1), vec![], vec![], Topology::Lines).unwrap();
        renderer.add_definition(empty).unwrap();

        let mut arena = ObjectArena::with_key();
        let key = arena.insert(RenderableObject::custom(DefinitionId(1)));
        renderer.add_object(key).unwrap();

        let mut device = RecordingDevice::new();
        assert_eq!(renderer.draw_all(&arena, &mut device).skipped, 1);
        assert_eq!(device.draw_calls().count(), 0);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut renderer = renderer();
        renderer.add_definition(pyramid(1)).unwrap();
        assert_eq!(
            renderer.add_definition(pyramid(1)),
            Err(RenderError::DuplicateDefinition(DefinitionId(1)))
        );

        let mut arena = ObjectArena::with_key();
        let key = arena.insert(RenderableObject::cube());
        renderer.add_object(key).unwrap();
        assert_eq!(renderer.add_object(key), Err(RenderError::DuplicateObject(key)));
    }

    #[test]
    fn test_swap_remove_keeps_index_consistent() {
        let mut renderer = renderer();
        let mut arena = ObjectArena::with_key();
        let keys: Vec<_> = (0..4)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f32;
                arena.insert(RenderableObject::cube().at(x, 0.0, 0.0))
            })
            .collect();
        for key in &keys {
            renderer.add_object(*key).unwrap();
        }

        renderer.remove_object(keys[1]).unwrap();
        assert_eq!(renderer.objects().collect::<Vec<_>>(), vec![keys[0], keys[3], keys[2]]);

        renderer.remove_object(keys[2]).unwrap();
        assert_eq!(renderer.objects().collect::<Vec<_>>(), vec![keys[0], keys[3]]);
        assert!(!renderer.contains(keys[2]));
        assert_eq!(renderer.remove_object(keys[2]), Err(RenderError::UnknownObject(keys[2])));

        renderer.remove_object(keys[0]).unwrap();
        renderer.remove_object(keys[3]).unwrap();
        assert_eq!(renderer.object_count(), 0);
    }

    #[test]
    fn test_failed_remove_keeps_index_and_list_in_step() {
        let mut renderer = renderer();
        let mut arena = ObjectArena::with_key();
        let kept = arena.insert(RenderableObject::cube());
        let last = arena.insert(RenderableObject::cube());
        let stranger = arena.insert(RenderableObject::cube());
        renderer.add_object(kept).unwrap();
        renderer.add_object(last).unwrap();

        assert_eq!(renderer.remove_object(stranger), Err(RenderError::UnknownObject(stranger)));
        assert_eq!(renderer.object_count(), 2);

        renderer.remove_object(last).unwrap();
        assert!(!renderer.contains(last));
        assert!(renderer.contains(kept));
        assert_eq!(renderer.objects().collect::<Vec<_>>(), vec![kept]);

        renderer.shutdown();
        assert_eq!(renderer.remove_object(kept), Err(RenderError::NotInitialized));
    }

    #[test]
    fn test_remove_definition_returns_it() {
        let mut renderer = renderer();
        renderer.add_definition(pyramid(3)).unwrap();
        let def = renderer.remove_definition(DefinitionId(3)).unwrap();
        assert_eq!(def.id(), DefinitionId(3));
        assert!(renderer.definition(DefinitionId(3)).is_none());
        assert_eq!(
            renderer.remove_definition(DefinitionId(3)),
            Err(RenderError::UnknownDefinition(DefinitionId(3)))
        );
    }

    #[test]
    fn test_despawned_object_is_skipped() {
        let mut renderer = renderer();
        let mut arena = ObjectArena::with_key();
        let key = arena.insert(RenderableObject::cube());
        renderer.add_object(key).unwrap();
        arena.remove(key);

        let mut device = RecordingDevice::new();
        let stats = renderer.draw_all(&arena, &mut device);
        assert_eq!(stats, DrawStats { drawn: 0, skipped: 1 });
        assert_eq!(renderer.last_frame_stats(), stats);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut renderer = renderer();
        renderer.add_definition(pyramid(1)).unwrap();
        renderer.shutdown();
        renderer.shutdown();
        assert!(!renderer.is_initialized());
        assert!(renderer.definition(DefinitionId(1)).is_none());
        renderer.init().unwrap();
    }
}

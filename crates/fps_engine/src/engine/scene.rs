//! Simulation state handed to every callback

use crate::foundation::time::FrameClock;
use crate::platform::WindowId;
use crate::render::{ObjectArena, ObjectKey, RenderResult, RenderableObject, Renderer};

/// Everything a callback may touch: the application's own state, the
/// object arena, and the renderer that draws it
///
/// Objects mutated through [`Scene::objects`] show up on the next draw pass.
pub struct Scene<S> {
    /// Application state
    pub state: S,

    /// Drawable objects, owned by the application
    pub objects: ObjectArena,

    /// Draw list and custom geometry
    pub renderer: Renderer,

    pub(crate) clock: FrameClock,
    pub(crate) window: Option<WindowId>,
    pub(crate) close_requested: bool,
}

impl<S> Scene<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            state,
            objects: ObjectArena::with_key(),
            renderer: Renderer::new(),
            clock: FrameClock::default(),
            window: None,
            close_requested: false,
        }
    }

    /// Ask the engine to close the window after the current frame
    pub fn request_close(&mut self) {
        log::debug!("close requested");
        self.close_requested = true;
    }

    /// Whether a close has been requested and not yet acted on
    pub const fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Window the engine is running, if any
    pub const fn window(&self) -> Option<WindowId> {
        self.window
    }

    /// Frame timing
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Insert an object and put it on the draw list
    ///
    /// If the renderer refuses it, the object is taken back out of the arena.
    pub fn spawn(&mut self, object: RenderableObject) -> RenderResult<ObjectKey> {
        let key = self.objects.insert(object);
        if let Err(e) = self.renderer.add_object(key) {
            self.objects.remove(key);
            return Err(e);
        }
        Ok(key)
    }

    /// Take an object off the draw list and out of the arena
    ///
    /// Returns `None` if the key was not spawned.
    pub fn despawn(&mut self, key: ObjectKey) -> Option<RenderableObject> {
        if self.renderer.contains(key) {
            if let Err(e) = self.renderer.remove_object(key) {
                log::error!("failed to remove {key:?} from the draw list: {e}");
            }
        }
        self.objects.remove(key)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Scene<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("state", &self.state)
            .field("objects", &self.objects.len())
            .field("renderer", &self.renderer)
            .field("window", &self.window)
            .field("close_requested", &self.close_requested)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_requires_renderer() {
        let mut scene = Scene::new(());
        assert!(scene.spawn(RenderableObject::cube()).is_err());
        assert!(scene.objects.is_empty());

        scene.renderer.init().unwrap();
        let key = scene.spawn(RenderableObject::cube()).unwrap();
        assert!(scene.renderer.contains(key));
        assert_eq!(scene.objects.len(), 1);

        assert!(scene.despawn(key).is_some());
        assert!(!scene.renderer.contains(key));
        assert!(scene.despawn(key).is_none());
    }

    #[test]
    fn test_request_close() {
        let mut scene = Scene::new(0_u32);
        assert!(!scene.close_requested());
        scene.request_close();
        assert!(scene.close_requested());
    }
}

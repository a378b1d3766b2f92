//! Core engine implementation
//!
//! [`Engine`] owns the platform, the event registry and the [`Scene`], and
//! drives them through a fixed lifecycle:
//!
//! ```text
//! Uninitialized --init--> Initialized --run--> Running --> Terminated
//!        \__________________ shutdown (any time) _________/
//! ```
//!
//! Each frame runs update, render, the renderer's draw pass, post-render,
//! a buffer swap and an event poll, in that order. Events polled at the end
//! of frame `n` are dispatched before frame `n + 1` starts, so state changed
//! by an event callback is visible to the next update.

mod scene;

#[cfg(test)]
mod lifecycle_tests;

pub use scene::Scene;

use thiserror::Error;

use crate::config::{ConfigError, EngineContext};
use crate::events::{
    CursorEnterEvent, CursorMoveEvent, EventRegistry, Filter, FramebufferResizeEvent, HostEvent,
    KeyEvent, MouseButtonEvent, ScrollEvent,
};
use crate::foundation::collections::ArrayError;
use crate::input::{Action, KeyCode, Modifiers, MouseButton};
use crate::platform::{Platform, PlatformError, WindowId};
use crate::render::{GraphicsDevice, RenderError};

/// Per-frame simulation step; receives seconds since the previous frame
pub type UpdateCallback<S> = Box<dyn FnMut(&mut Scene<S>, f64)>;

/// Render or post-render hook, called once per frame
pub type RenderCallback<S> = Box<dyn FnMut(&mut Scene<S>, &mut dyn GraphicsDevice)>;

/// One-time setup hook, called after the graphics context becomes current
pub type PreRunCallback<S> = Box<dyn FnOnce(&mut Scene<S>, &mut dyn GraphicsDevice)>;

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Constructed, `init` not yet called
    Uninitialized,
    /// `init` succeeded; `run` may be called once
    Initialized,
    /// Inside the frame loop
    Running,
    /// `run` returned or `shutdown` ran
    Terminated,
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// `init` called outside the uninitialized state
    #[error("engine already initialized (state {0:?})")]
    AlreadyInitialized(EngineState),

    /// Operation needs a successful `init` first
    #[error("engine is not initialized")]
    NotInitialized,

    /// Engine context rejected
    #[error("invalid engine context: {0}")]
    Config(#[from] ConfigError),

    /// Host platform failure
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Callback registry failure
    #[error("callback registry error: {0}")]
    Registry(#[from] ArrayError),

    /// Renderer failure
    #[error("renderer error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Main engine struct
///
/// `S` is the application's state, reachable from every callback through
/// [`Scene::state`]. `P` is the host platform.
pub struct Engine<S, P: Platform> {
    platform: P,
    scene: Scene<S>,
    registry: EventRegistry<Scene<S>>,
    context: Option<EngineContext>,
    lifecycle: EngineState,
    platform_ready: bool,
    shutdown_armed: bool,
    update: Option<UpdateCallback<S>>,
    render: Option<RenderCallback<S>>,
    post_render: Option<RenderCallback<S>>,
    pre_run: Option<PreRunCallback<S>>,
    pending_events: Vec<HostEvent>,
}

impl<S, P: Platform> Engine<S, P> {
    /// Create an uninitialized engine
    pub fn new(platform: P, state: S) -> Self {
        Self {
            platform,
            scene: Scene::new(state),
            registry: EventRegistry::new(),
            context: None,
            lifecycle: EngineState::Uninitialized,
            platform_ready: false,
            shutdown_armed: false,
            update: None,
            render: None,
            post_render: None,
            pre_run: None,
            pending_events: Vec::new(),
        }
    }

    /// Validate the context and bring up every subsystem
    ///
    /// On failure the engine stays uninitialized; whatever was already
    /// allocated is released by [`Engine::shutdown`] (or on drop).
    pub fn init(&mut self, context: EngineContext) -> EngineResult<()> {
        if self.lifecycle != EngineState::Uninitialized {
            log::error!("engine already initialized ({:?})", self.lifecycle);
            return Err(EngineError::AlreadyInitialized(self.lifecycle));
        }

        log::debug!("initializing engine...");
        self.shutdown_armed = true;

        context.validate().map_err(|e| {
            log::error!("engine context rejected: {e}");
            e
        })?;

        self.registry.init()?;
        self.scene.renderer.init()?;

        self.platform_ready = false;
        self.platform.init().map_err(|e| {
            log::error!("failed to initialize the platform: {e}");
            e
        })?;
        self.platform_ready = true;

        self.context = Some(context);
        self.lifecycle = EngineState::Initialized;
        log::debug!("engine initialization complete");
        Ok(())
    }

    /// Open the window and run frames until it closes
    ///
    /// The context is consumed whether the loop ends normally or with an
    /// error; either way the engine ends up [`EngineState::Terminated`].
    pub fn run(&mut self) -> EngineResult<()> {
        if self.lifecycle != EngineState::Initialized {
            log::error!("run called in state {:?}", self.lifecycle);
            return Err(EngineError::NotInitialized);
        }
        let Some(context) = self.context.take() else {
            log::error!("engine context is missing");
            return Err(EngineError::NotInitialized);
        };

        self.lifecycle = EngineState::Running;
        let result = self.open_and_drive(&context);
        self.lifecycle = EngineState::Terminated;

        if let Err(e) = &result {
            log::error!("engine run failed: {e}");
        }
        result
    }

    fn open_and_drive(&mut self, context: &EngineContext) -> EngineResult<()> {
        let window = self.platform.create_window(
            context.window_width,
            context.window_height,
            &context.window_title,
        )?;
        self.scene.window = Some(window);

        let result = self.drive(window, context);

        self.platform.destroy_window(window);
        self.scene.window = None;
        self.scene.close_requested = false;
        log::debug!("window destroyed");
        result
    }

    fn drive(&mut self, window: WindowId, context: &EngineContext) -> EngineResult<()> {
        self.platform.enable_event_streams(window)?;
        if context.mouse_disabled {
            self.platform.set_cursor_disabled(window, true)?;
        }
        log::debug!("window created and configured");

        self.platform.make_context_current(window)?;

        if let Some(pre_run) = self.pre_run.take() {
            let device = self.platform.graphics()?;
            pre_run(&mut self.scene, device);
        }

        log::debug!("starting main processing loop...");
        self.scene.clock.reset(self.platform.now());

        while !self.platform.should_close(window) {
            self.frame(window)?;
        }

        log::debug!(
            "main loop finished after {} frames ({:.1} fps average)",
            self.scene.clock.frame_count(),
            self.scene.clock.average_fps()
        );
        Ok(())
    }

    fn frame(&mut self, window: WindowId) -> EngineResult<()> {
        let delta = self.scene.clock.tick(self.platform.now());

        if let Some(update) = self.update.as_mut() {
            update(&mut self.scene, delta);
        }

        let device = self.platform.graphics()?;
        if let Some(render) = self.render.as_mut() {
            render(&mut self.scene, &mut *device);
        }
        let Scene {
            objects, renderer, ..
        } = &mut self.scene;
        renderer.draw_all(objects, &mut *device);
        if let Some(post_render) = self.post_render.as_mut() {
            post_render(&mut self.scene, &mut *device);
        }

        self.platform.swap_buffers(window);

        self.pending_events.clear();
        self.platform.poll_events(&mut self.pending_events);
        for event in &self.pending_events {
            self.registry.dispatch(&mut self.scene, event);
        }

        if self.scene.close_requested {
            self.platform.set_should_close(window, true);
        }
        Ok(())
    }

    /// Tear everything down
    ///
    /// Safe to call any number of times, after a failed `init`, or never
    /// (dropping the engine runs it). The platform is only terminated if its
    /// `init` succeeded.
    pub fn shutdown(&mut self) {
        if !self.shutdown_armed {
            return;
        }
        self.shutdown_armed = false;
        log::debug!("shutting down...");

        if self.platform_ready {
            self.platform.terminate();
            self.platform_ready = false;
            log::debug!("platform terminated");
        }

        let released = self.registry.destroy();
        log::debug!("callback arrays destroyed ({released} callbacks)");

        self.scene.renderer.shutdown();
        self.context = None;
        self.lifecycle = EngineState::Terminated;
        log::debug!("shutdown complete");
    }

    fn ensure_registry(&self) -> EngineResult<()> {
        if self.registry.is_initialized() {
            Ok(())
        } else {
            log::error!("callbacks can only be registered after init");
            Err(EngineError::NotInitialized)
        }
    }

    /// Subscribe to key events; any filter may be [`Filter::Any`]
    pub fn register_key_callback(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        key: impl Into<Filter<KeyCode>>,
        scancode: impl Into<Filter<i32>>,
        action: impl Into<Filter<Action>>,
        mods: impl Into<Filter<Modifiers>>,
        callback: impl FnMut(&mut Scene<S>, &KeyEvent) + 'static,
    ) -> EngineResult<()> {
        self.ensure_registry()?;
        self.registry
            .register_key(window, key, scancode, action, mods, Box::new(callback))?;
        Ok(())
    }

    /// Subscribe to cursor movement
    pub fn register_cursor_move_callback(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        callback: impl FnMut(&mut Scene<S>, &CursorMoveEvent) + 'static,
    ) -> EngineResult<()> {
        self.ensure_registry()?;
        self.registry.register_cursor_move(window, Box::new(callback))?;
        Ok(())
    }

    /// Subscribe to the cursor entering or leaving a window
    pub fn register_cursor_enter_callback(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        entered: impl Into<Filter<bool>>,
        callback: impl FnMut(&mut Scene<S>, &CursorEnterEvent) + 'static,
    ) -> EngineResult<()> {
        self.ensure_registry()?;
        self.registry
            .register_cursor_enter(window, entered, Box::new(callback))?;
        Ok(())
    }

    /// Subscribe to mouse buttons
    pub fn register_mouse_button_callback(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        button: impl Into<Filter<MouseButton>>,
        action: impl Into<Filter<Action>>,
        mods: impl Into<Filter<Modifiers>>,
        callback: impl FnMut(&mut Scene<S>, &MouseButtonEvent) + 'static,
    ) -> EngineResult<()> {
        self.ensure_registry()?;
        self.registry
            .register_mouse_button(window, button, action, mods, Box::new(callback))?;
        Ok(())
    }

    /// Subscribe to scrolling
    pub fn register_scroll_callback(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        callback: impl FnMut(&mut Scene<S>, &ScrollEvent) + 'static,
    ) -> EngineResult<()> {
        self.ensure_registry()?;
        self.registry.register_scroll(window, Box::new(callback))?;
        Ok(())
    }

    /// Subscribe to framebuffer resizes
    pub fn register_framebuffer_resize_callback(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        callback: impl FnMut(&mut Scene<S>, &FramebufferResizeEvent) + 'static,
    ) -> EngineResult<()> {
        self.ensure_registry()?;
        self.registry
            .register_framebuffer_resize(window, Box::new(callback))?;
        Ok(())
    }

    /// Set the per-frame update; replaces any earlier one
    pub fn register_update_callback(&mut self, callback: impl FnMut(&mut Scene<S>, f64) + 'static) {
        self.update = Some(Box::new(callback));
    }

    /// Set the render hook run before the draw pass; replaces any earlier one
    pub fn register_render_callback(
        &mut self,
        callback: impl FnMut(&mut Scene<S>, &mut dyn GraphicsDevice) + 'static,
    ) {
        self.render = Some(Box::new(callback));
    }

    /// Set the hook run after the draw pass; replaces any earlier one
    pub fn register_postrender_callback(
        &mut self,
        callback: impl FnMut(&mut Scene<S>, &mut dyn GraphicsDevice) + 'static,
    ) {
        self.post_render = Some(Box::new(callback));
    }

    /// Set the one-time setup hook; replaces any earlier one
    pub fn register_prerun_callback(
        &mut self,
        callback: impl FnOnce(&mut Scene<S>, &mut dyn GraphicsDevice) + 'static,
    ) {
        self.pre_run = Some(Box::new(callback));
    }

    /// Lifecycle state
    pub const fn lifecycle(&self) -> EngineState {
        self.lifecycle
    }

    /// Context held between `init` and `run`
    pub const fn context(&self) -> Option<&EngineContext> {
        self.context.as_ref()
    }

    /// Application state
    pub const fn state(&self) -> &S {
        &self.scene.state
    }

    /// Mutable application state
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.scene.state
    }

    /// The scene callbacks operate on
    pub const fn scene(&self) -> &Scene<S> {
        &self.scene
    }

    /// Mutable scene
    pub fn scene_mut(&mut self) -> &mut Scene<S> {
        &mut self.scene
    }

    /// The host platform
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// Frames completed by the last (or current) run
    pub const fn frame_count(&self) -> u64 {
        self.scene.clock.frame_count()
    }
}

impl<S, P: Platform> Drop for Engine<S, P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

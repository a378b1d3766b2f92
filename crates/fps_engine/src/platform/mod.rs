//! Window and host-event platform layer
//!
//! The engine never talks to a windowing library directly. Everything it
//! needs from the host (window creation, a current GL context, input events,
//! a monotonic clock, buffer swaps) goes through the [`Platform`] trait.
//!
//! Two implementations ship with the crate:
//! - [`GlfwPlatform`]: a real GLFW window with a legacy OpenGL context
//! - [`HeadlessPlatform`]: scripted clock and events, records draw calls;
//!   used by the engine's tests and for running without a display

mod glfw;
mod headless;

pub use self::glfw::GlfwPlatform;
pub use headless::{HeadlessPlatform, PRIMARY_WINDOW};

use thiserror::Error;

use crate::events::HostEvent;
use crate::render::GraphicsDevice;

/// Opaque identifier of a platform window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    /// Wrap a raw platform id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw platform id
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Platform errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The host windowing library could not start
    #[error("platform initialization failed: {0}")]
    InitializationFailed(String),

    /// Window or context creation failed
    #[error("window creation failed: {0}")]
    WindowCreationFailed(String),

    /// The id does not name a live window
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),

    /// No graphics context is current
    #[error("no graphics context is current")]
    NoContext,

    /// A required graphics entry point could not be loaded
    #[error("graphics entry point {0} is unavailable")]
    MissingEntryPoint(&'static str),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Host services the engine's lifecycle and frame loop run on
///
/// All calls happen on the thread that owns the engine. Implementations are
/// expected to tolerate `terminate` being called more than once.
pub trait Platform {
    /// Start the host windowing library
    fn init(&mut self) -> PlatformResult<()>;

    /// Shut the host windowing library down, destroying any remaining windows
    fn terminate(&mut self);

    /// Create a visible window with a graphics context
    fn create_window(&mut self, width: u32, height: u32, title: &str) -> PlatformResult<WindowId>;

    /// Destroy a window; unknown ids are ignored
    fn destroy_window(&mut self, window: WindowId);

    /// Start delivering key, cursor, button, scroll and resize events for `window`
    fn enable_event_streams(&mut self, window: WindowId) -> PlatformResult<()>;

    /// Hide and capture the cursor (relative "FPS" mouse) or restore it
    fn set_cursor_disabled(&mut self, window: WindowId, disabled: bool) -> PlatformResult<()>;

    /// Make the window's graphics context current on this thread
    fn make_context_current(&mut self, window: WindowId) -> PlatformResult<()>;

    /// Graphics device bound to the current context
    fn graphics(&mut self) -> PlatformResult<&mut dyn GraphicsDevice>;

    /// Whether the window has been asked to close
    fn should_close(&self, window: WindowId) -> bool;

    /// Raise or clear the window's close flag
    fn set_should_close(&mut self, window: WindowId, value: bool);

    /// Present the back buffer
    fn swap_buffers(&mut self, window: WindowId);

    /// Process pending host events, appending them to `out` in arrival order
    fn poll_events(&mut self, out: &mut Vec<HostEvent>);

    /// Monotonic time in seconds
    fn now(&self) -> f64;
}

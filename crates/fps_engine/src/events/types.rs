//! Raw host events as delivered by the platform layer

use crate::input::{Action, KeyCode, Modifiers, MouseButton};
use crate::platform::WindowId;

/// Keyboard key state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Window that had focus
    pub window: WindowId,
    /// Engine key code
    pub key: KeyCode,
    /// Platform-specific scancode
    pub scancode: i32,
    /// Press, release or repeat
    pub action: Action,
    /// Modifiers held at the time
    pub mods: Modifiers,
}

/// Cursor moved inside a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorMoveEvent {
    /// Window the cursor is over
    pub window: WindowId,
    /// X position in screen coordinates relative to the client area
    pub x: f64,
    /// Y position in screen coordinates relative to the client area
    pub y: f64,
}

/// Cursor entered or left a window's client area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorEnterEvent {
    /// Window entered or left
    pub window: WindowId,
    /// `true` on enter, `false` on leave
    pub entered: bool,
}

/// Mouse button state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    /// Window that received the click
    pub window: WindowId,
    /// Button pressed or released
    pub button: MouseButton,
    /// Press or release
    pub action: Action,
    /// Modifiers held at the time
    pub mods: Modifiers,
}

/// Scroll wheel or touchpad scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Window scrolled over
    pub window: WindowId,
    /// Horizontal offset
    pub x_offset: f64,
    /// Vertical offset
    pub y_offset: f64,
}

/// Framebuffer size changed (in pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferResizeEvent {
    /// Window whose framebuffer changed
    pub window: WindowId,
    /// New width in pixels
    pub width: i32,
    /// New height in pixels
    pub height: i32,
}

/// Any event the host can report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Keyboard event
    Key(KeyEvent),
    /// Cursor position event
    CursorMove(CursorMoveEvent),
    /// Cursor enter/leave event
    CursorEnter(CursorEnterEvent),
    /// Mouse button event
    MouseButton(MouseButtonEvent),
    /// Scroll event
    Scroll(ScrollEvent),
    /// Framebuffer resize event
    FramebufferResize(FramebufferResizeEvent),
}

impl HostEvent {
    /// Window the event belongs to
    pub const fn window(&self) -> WindowId {
        match self {
            Self::Key(e) => e.window,
            Self::CursorMove(e) => e.window,
            Self::CursorEnter(e) => e.window,
            Self::MouseButton(e) => e.window,
            Self::Scroll(e) => e.window,
            Self::FramebufferResize(e) => e.window,
        }
    }
}

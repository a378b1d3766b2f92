//! Input vocabulary shared by the event registry and the platform layer
//!
//! These types are backend-agnostic; the GLFW platform maps its own key,
//! button and modifier values onto them before dispatch.

use bitflags::bitflags;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Digit key on the main row (0-9)
    Digit(u8),
    /// Function key (F1-F25)
    Function(u8),
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Left shift
    LeftShift,
    /// Right shift
    RightShift,
    /// Left control
    LeftControl,
    /// Right control
    RightControl,
    /// Left alt
    LeftAlt,
    /// Right alt
    RightAlt,
    /// A key the engine has no name for, carrying the host's key value
    Other(i32),
}

/// Press state reported with key and mouse button events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Key or button released
    Release,
    /// Key or button pressed
    Press,
    /// Key held long enough to auto-repeat
    Repeat,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Extra buttons, numbered from 4
    Other(u8),
}

bitflags! {
    /// Modifier keys held during a key or mouse button event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// Either shift key
        const SHIFT = 0x0001;
        /// Either control key
        const CONTROL = 0x0002;
        /// Either alt key
        const ALT = 0x0004;
        /// Either super (logo) key
        const SUPER = 0x0008;
        /// Caps lock active
        const CAPS_LOCK = 0x0010;
        /// Num lock active
        const NUM_LOCK = 0x0020;
    }
}

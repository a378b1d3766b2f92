//! GLFW window host
//!
//! Opens a single window with an OpenGL compatibility context and maps
//! GLFW's callbacks onto the engine's [`HostEvent`]s.

use glfw::Context;

use super::{Platform, PlatformError, PlatformResult, WindowId};
use crate::events::{
    CursorEnterEvent, CursorMoveEvent, FramebufferResizeEvent, HostEvent, KeyEvent,
    MouseButtonEvent, ScrollEvent,
};
use crate::input::{Action, KeyCode, Modifiers, MouseButton};
use crate::render::{GraphicsDevice, LegacyGl};

struct GlfwWindow {
    id: WindowId,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

/// GLFW-backed [`Platform`]
///
/// Supports one window at a time, which is all the engine opens.
pub struct GlfwPlatform {
    glfw: Option<glfw::Glfw>,
    window: Option<GlfwWindow>,
    device: Option<LegacyGl>,
    next_window: u64,
}

impl Default for GlfwPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl GlfwPlatform {
    /// Platform that has not started GLFW yet
    pub const fn new() -> Self {
        Self {
            glfw: None,
            window: None,
            device: None,
            next_window: 1,
        }
    }

    fn window_mut(&mut self, window: WindowId) -> PlatformResult<&mut GlfwWindow> {
        self.window
            .as_mut()
            .filter(|w| w.id == window)
            .ok_or(PlatformError::UnknownWindow(window))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("glfw error {error:?}: {description}");
}

impl Platform for GlfwPlatform {
    fn init(&mut self) -> PlatformResult<()> {
        if self.glfw.is_some() {
            return Ok(());
        }
        let mut glfw = glfw::init(log_glfw_error)
            .map_err(|e| PlatformError::InitializationFailed(format!("{e:?}")))?;
        glfw.window_hint(glfw::WindowHint::ContextVersion(2, 1));
        glfw.window_hint(glfw::WindowHint::Resizable(true));
        self.glfw = Some(glfw);
        log::debug!("glfw initialized");
        Ok(())
    }

    fn terminate(&mut self) {
        self.device = None;
        self.window = None;
        if self.glfw.take().is_some() {
            log::debug!("glfw terminated");
        }
    }

    fn create_window(&mut self, width: u32, height: u32, title: &str) -> PlatformResult<WindowId> {
        if self.window.is_some() {
            return Err(PlatformError::WindowCreationFailed(
                "a window is already open".to_string(),
            ));
        }
        let glfw = self.glfw.as_mut().ok_or_else(|| {
            PlatformError::WindowCreationFailed("glfw is not initialized".to_string())
        })?;

        let (window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| PlatformError::WindowCreationFailed(title.to_string()))?;

        let id = WindowId::new(self.next_window);
        self.next_window += 1;
        self.window = Some(GlfwWindow { id, window, events });
        log::debug!("created {id} ({width}x{height} \"{title}\")");
        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowId) {
        if self.window.as_ref().is_some_and(|w| w.id == window) {
            self.device = None;
            self.window = None;
            log::debug!("destroyed {window}");
        }
    }

    fn enable_event_streams(&mut self, window: WindowId) -> PlatformResult<()> {
        let window = &mut self.window_mut(window)?.window;
        window.set_key_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_cursor_enter_polling(true);
        window.set_mouse_button_polling(true);
        window.set_scroll_polling(true);
        window.set_framebuffer_size_polling(true);
        Ok(())
    }

    fn set_cursor_disabled(&mut self, window: WindowId, disabled: bool) -> PlatformResult<()> {
        let mode = if disabled {
            glfw::CursorMode::Disabled
        } else {
            glfw::CursorMode::Normal
        };
        self.window_mut(window)?.window.set_cursor_mode(mode);
        Ok(())
    }

    fn make_context_current(&mut self, window: WindowId) -> PlatformResult<()> {
        let state = self.window_mut(window)?;
        state.window.make_current();
        let handle = &mut state.window;
        let device = LegacyGl::load(|name| handle.get_proc_address(name) as *const std::ffi::c_void)?;
        self.device = Some(device);
        Ok(())
    }

    fn graphics(&mut self) -> PlatformResult<&mut dyn GraphicsDevice> {
        self.device
            .as_mut()
            .map(|device| device as &mut dyn GraphicsDevice)
            .ok_or(PlatformError::NoContext)
    }

    fn should_close(&self, window: WindowId) -> bool {
        self.window
            .as_ref()
            .filter(|w| w.id == window)
            .map_or(true, |w| w.window.should_close())
    }

    fn set_should_close(&mut self, window: WindowId, value: bool) {
        if let Ok(state) = self.window_mut(window) {
            state.window.set_should_close(value);
        }
    }

    fn swap_buffers(&mut self, window: WindowId) {
        if let Ok(state) = self.window_mut(window) {
            state.window.swap_buffers();
        }
    }

    fn poll_events(&mut self, out: &mut Vec<HostEvent>) {
        let Some(glfw) = self.glfw.as_mut() else {
            return;
        };
        glfw.poll_events();

        let Some(state) = self.window.as_ref() else {
            return;
        };
        out.extend(
            glfw::flush_messages(&state.events).filter_map(|(_, event)| map_event(state.id, event)),
        );
    }

    fn now(&self) -> f64 {
        self.glfw.as_ref().map_or(0.0, glfw::Glfw::get_time)
    }
}

fn map_event(window: WindowId, event: glfw::WindowEvent) -> Option<HostEvent> {
    let event = match event {
        glfw::WindowEvent::Key(key, scancode, action, mods) => HostEvent::Key(KeyEvent {
            window,
            key: map_key(key),
            scancode,
            action: map_action(action),
            mods: map_modifiers(mods),
        }),
        glfw::WindowEvent::CursorPos(x, y) => {
            HostEvent::CursorMove(CursorMoveEvent { window, x, y })
        }
        glfw::WindowEvent::CursorEnter(entered) => {
            HostEvent::CursorEnter(CursorEnterEvent { window, entered })
        }
        glfw::WindowEvent::MouseButton(button, action, mods) => {
            HostEvent::MouseButton(MouseButtonEvent {
                window,
                button: map_mouse_button(button),
                action: map_action(action),
                mods: map_modifiers(mods),
            })
        }
        glfw::WindowEvent::Scroll(x_offset, y_offset) => HostEvent::Scroll(ScrollEvent {
            window,
            x_offset,
            y_offset,
        }),
        glfw::WindowEvent::FramebufferSize(width, height) => {
            HostEvent::FramebufferResize(FramebufferResizeEvent {
                window,
                width,
                height,
            })
        }
        _ => return None,
    };
    Some(event)
}

const fn map_action(action: glfw::Action) -> Action {
    match action {
        glfw::Action::Release => Action::Release,
        glfw::Action::Press => Action::Press,
        glfw::Action::Repeat => Action::Repeat,
    }
}

#[allow(clippy::cast_sign_loss)]
fn map_modifiers(mods: glfw::Modifiers) -> Modifiers {
    Modifiers::from_bits_truncate(mods.bits() as u32)
}

const fn map_mouse_button(button: glfw::MouseButton) -> MouseButton {
    match button {
        glfw::MouseButton::Button1 => MouseButton::Left,
        glfw::MouseButton::Button2 => MouseButton::Right,
        glfw::MouseButton::Button3 => MouseButton::Middle,
        glfw::MouseButton::Button4 => MouseButton::Other(4),
        glfw::MouseButton::Button5 => MouseButton::Other(5),
        glfw::MouseButton::Button6 => MouseButton::Other(6),
        glfw::MouseButton::Button7 => MouseButton::Other(7),
        glfw::MouseButton::Button8 => MouseButton::Other(8),
    }
}

#[allow(clippy::too_many_lines)]
fn map_key(key: glfw::Key) -> KeyCode {
    use glfw::Key;

    match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Num0 => KeyCode::Digit(0),
        Key::Num1 => KeyCode::Digit(1),
        Key::Num2 => KeyCode::Digit(2),
        Key::Num3 => KeyCode::Digit(3),
        Key::Num4 => KeyCode::Digit(4),
        Key::Num5 => KeyCode::Digit(5),
        Key::Num6 => KeyCode::Digit(6),
        Key::Num7 => KeyCode::Digit(7),
        Key::Num8 => KeyCode::Digit(8),
        Key::Num9 => KeyCode::Digit(9),
        Key::F1 => KeyCode::Function(1),
        Key::F2 => KeyCode::Function(2),
        Key::F3 => KeyCode::Function(3),
        Key::F4 => KeyCode::Function(4),
        Key::F5 => KeyCode::Function(5),
        Key::F6 => KeyCode::Function(6),
        Key::F7 => KeyCode::Function(7),
        Key::F8 => KeyCode::Function(8),
        Key::F9 => KeyCode::Function(9),
        Key::F10 => KeyCode::Function(10),
        Key::F11 => KeyCode::Function(11),
        Key::F12 => KeyCode::Function(12),
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Tab => KeyCode::Tab,
        Key::Backspace => KeyCode::Backspace,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::LeftShift => KeyCode::LeftShift,
        Key::RightShift => KeyCode::RightShift,
        Key::LeftControl => KeyCode::LeftControl,
        Key::RightControl => KeyCode::RightControl,
        Key::LeftAlt => KeyCode::LeftAlt,
        Key::RightAlt => KeyCode::RightAlt,
        other => KeyCode::Other(other as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(glfw::Key::Escape), KeyCode::Escape);
        assert_eq!(map_key(glfw::Key::Num7), KeyCode::Digit(7));
        assert_eq!(map_key(glfw::Key::F11), KeyCode::Function(11));
        assert_eq!(map_key(glfw::Key::Home), KeyCode::Other(glfw::Key::Home as i32));
    }

    #[test]
    fn test_modifier_bits_line_up() {
        let mods = glfw::Modifiers::Shift | glfw::Modifiers::Alt;
        assert_eq!(map_modifiers(mods), Modifiers::SHIFT | Modifiers::ALT);
    }

    #[test]
    fn test_event_mapping() {
        let id = WindowId::new(3);
        let mapped = map_event(id, glfw::WindowEvent::Scroll(0.0, -2.0));
        assert_eq!(
            mapped,
            Some(HostEvent::Scroll(ScrollEvent { window: id, x_offset: 0.0, y_offset: -2.0 }))
        );
        assert_eq!(map_event(id, glfw::WindowEvent::Close), None);
        assert_eq!(map_mouse_button(glfw::MouseButton::Button2), MouseButton::Right);
    }

    #[test]
    fn test_uninitialized_platform() {
        let mut platform = GlfwPlatform::new();
        assert!(platform.create_window(1, 1, "x").is_err());
        assert!(platform.should_close(WindowId::new(1)));
        assert_eq!(platform.now(), 0.0);
        assert!(matches!(platform.graphics(), Err(PlatformError::NoContext)));
        platform.terminate();
    }
}

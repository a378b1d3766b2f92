//! Scripted platform without a display
//!
//! The clock, the event stream and the window's lifetime are all driven by
//! a script set up before the engine runs. Frame `n` (counting buffer swaps
//! from zero) receives the events queued for it on the poll that follows
//! its swap. Rendering goes to a [`RecordingDevice`].

use std::collections::{BTreeMap, VecDeque};

use super::{Platform, PlatformError, PlatformResult, WindowId};
use crate::events::HostEvent;
use crate::render::{GraphicsDevice, RecordingDevice};

/// Id the headless platform gives the first window it creates
pub const PRIMARY_WINDOW: WindowId = WindowId::new(1);

#[derive(Debug, Clone)]
enum ClockScript {
    FixedStep { start: f64, step: f64 },
    Timestamps(VecDeque<f64>),
}

#[derive(Debug, Clone, Default)]
struct HeadlessWindow {
    id: Option<WindowId>,
    should_close: bool,
    events_enabled: bool,
    cursor_disabled: bool,
    context_current: bool,
    title: String,
    size: (u32, u32),
}

/// Platform driven by a script instead of a window system
#[derive(Debug)]
pub struct HeadlessPlatform {
    initialized: bool,
    fail_init: bool,
    fail_window: bool,
    next_window: u64,
    window: HeadlessWindow,
    clock: ClockScript,
    last_reading: std::cell::Cell<f64>,
    clock_reads: std::cell::Cell<u64>,
    frame_limit: Option<u64>,
    frames_presented: u64,
    scripted_events: BTreeMap<u64, Vec<HostEvent>>,
    device: RecordingDevice,
    init_calls: usize,
    terminate_calls: usize,
    windows_destroyed: usize,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// Platform whose clock advances 1/60 s per reading
    pub fn new() -> Self {
        Self {
            initialized: false,
            fail_init: false,
            fail_window: false,
            next_window: PRIMARY_WINDOW.raw(),
            window: HeadlessWindow::default(),
            clock: ClockScript::FixedStep {
                start: 0.0,
                step: 1.0 / 60.0,
            },
            last_reading: std::cell::Cell::new(0.0),
            clock_reads: std::cell::Cell::new(0),
            frame_limit: None,
            frames_presented: 0,
            scripted_events: BTreeMap::new(),
            device: RecordingDevice::new(),
            init_calls: 0,
            terminate_calls: 0,
            windows_destroyed: 0,
        }
    }

    /// Clock starting at `start` that advances `step` seconds per reading
    #[must_use]
    pub fn with_fixed_step(mut self, start: f64, step: f64) -> Self {
        self.clock = ClockScript::FixedStep { start, step };
        self
    }

    /// Clock returning these readings in order, then repeating the last one
    #[must_use]
    pub fn with_timestamps(mut self, readings: impl IntoIterator<Item = f64>) -> Self {
        self.clock = ClockScript::Timestamps(readings.into_iter().collect());
        self
    }

    /// Close the window once this many frames have been presented
    #[must_use]
    pub const fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Deliver `event` on the poll that follows frame `frame`'s buffer swap
    #[must_use]
    pub fn with_event(mut self, frame: u64, event: HostEvent) -> Self {
        self.queue_event(frame, event);
        self
    }

    /// Make [`Platform::init`] fail
    #[must_use]
    pub const fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make [`Platform::create_window`] fail
    #[must_use]
    pub const fn failing_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    /// Queue an event for the poll after frame `frame`
    pub fn queue_event(&mut self, frame: u64, event: HostEvent) {
        self.scripted_events.entry(frame).or_default().push(event);
    }

    /// The recording device
    pub const fn device(&self) -> &RecordingDevice {
        &self.device
    }

    /// Whether `init` succeeded and `terminate` has not run since
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// How many times `init` was called
    pub const fn init_calls(&self) -> usize {
        self.init_calls
    }

    /// How many times `terminate` was called
    pub const fn terminate_calls(&self) -> usize {
        self.terminate_calls
    }

    /// How many windows were destroyed
    pub const fn windows_destroyed(&self) -> usize {
        self.windows_destroyed
    }

    /// Buffer swaps so far
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Whether a window currently exists
    pub const fn has_window(&self) -> bool {
        self.window.id.is_some()
    }

    /// Title of the most recently created window
    pub fn window_title(&self) -> &str {
        &self.window.title
    }

    /// Size of the most recently created window
    pub const fn window_size(&self) -> (u32, u32) {
        self.window.size
    }

    /// Whether the most recent window had its event streams enabled
    pub const fn events_enabled(&self) -> bool {
        self.window.events_enabled
    }

    /// Whether the most recent window captured the cursor
    pub const fn cursor_disabled(&self) -> bool {
        self.window.cursor_disabled
    }

    fn close_window(&mut self) {
        self.window.id = None;
        self.window.context_current = false;
        self.window.should_close = false;
        self.windows_destroyed += 1;
    }

    fn window_mut(&mut self, window: WindowId) -> PlatformResult<&mut HeadlessWindow> {
        if self.window.id == Some(window) {
            Ok(&mut self.window)
        } else {
            Err(PlatformError::UnknownWindow(window))
        }
    }
}

impl Platform for HeadlessPlatform {
    fn init(&mut self) -> PlatformResult<()> {
        self.init_calls += 1;
        if self.fail_init {
            return Err(PlatformError::InitializationFailed(
                "headless platform scripted to fail".to_string(),
            ));
        }
        self.initialized = true;
        log::debug!("headless platform initialized");
        Ok(())
    }

    fn terminate(&mut self) {
        self.terminate_calls += 1;
        if self.window.id.is_some() {
            self.close_window();
        }
        self.initialized = false;
        log::debug!("headless platform terminated");
    }

    fn create_window(&mut self, width: u32, height: u32, title: &str) -> PlatformResult<WindowId> {
        if !self.initialized {
            return Err(PlatformError::WindowCreationFailed(
                "platform is not initialized".to_string(),
            ));
        }
        if self.fail_window {
            return Err(PlatformError::WindowCreationFailed(
                "headless platform scripted to fail".to_string(),
            ));
        }
        if self.window.id.is_some() {
            return Err(PlatformError::WindowCreationFailed(
                "headless platform supports one window".to_string(),
            ));
        }

        let id = WindowId::new(self.next_window);
        self.next_window += 1;
        self.window = HeadlessWindow {
            id: Some(id),
            title: title.to_string(),
            size: (width, height),
            ..HeadlessWindow::default()
        };
        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowId) {
        if self.window.id == Some(window) {
            self.close_window();
        }
    }

    fn enable_event_streams(&mut self, window: WindowId) -> PlatformResult<()> {
        self.window_mut(window)?.events_enabled = true;
        Ok(())
    }

    fn set_cursor_disabled(&mut self, window: WindowId, disabled: bool) -> PlatformResult<()> {
        self.window_mut(window)?.cursor_disabled = disabled;
        Ok(())
    }

    fn make_context_current(&mut self, window: WindowId) -> PlatformResult<()> {
        self.window_mut(window)?.context_current = true;
        Ok(())
    }

    fn graphics(&mut self) -> PlatformResult<&mut dyn GraphicsDevice> {
        if self.window.context_current {
            Ok(&mut self.device)
        } else {
            Err(PlatformError::NoContext)
        }
    }

    fn should_close(&self, window: WindowId) -> bool {
        if self.window.id != Some(window) {
            return true;
        }
        self.window.should_close || self.frame_limit.is_some_and(|limit| self.frames_presented >= limit)
    }

    fn set_should_close(&mut self, window: WindowId, value: bool) {
        if let Ok(state) = self.window_mut(window) {
            state.should_close = value;
        }
    }

    fn swap_buffers(&mut self, window: WindowId) {
        if self.window.id == Some(window) {
            self.device.present();
            self.frames_presented += 1;
        }
    }

    fn poll_events(&mut self, out: &mut Vec<HostEvent>) {
        let frame = self.frames_presented.saturating_sub(1);
        if let Some(events) = self.scripted_events.remove(&frame) {
            out.extend(events);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn now(&self) -> f64 {
        let reads = self.clock_reads.get();
        self.clock_reads.set(reads + 1);
        let reading = match &self.clock {
            ClockScript::FixedStep { start, step } => start + step * reads as f64,
            ClockScript::Timestamps(readings) => usize::try_from(reads)
                .ok()
                .and_then(|idx| readings.get(idx).copied())
                .unwrap_or_else(|| self.last_reading.get()),
        };
        self.last_reading.set(reading);
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ScrollEvent;

    #[test]
    fn test_window_requires_init() {
        let mut platform = HeadlessPlatform::new();
        assert!(platform.create_window(1, 1, "x").is_err());
        platform.init().unwrap();
        assert_eq!(platform.create_window(4, 3, "x").unwrap(), PRIMARY_WINDOW);
        assert_eq!(platform.window_size(), (4, 3));
    }

    #[test]
    fn test_graphics_requires_current_context() {
        let mut platform = HeadlessPlatform::new();
        platform.init().unwrap();
        let window = platform.create_window(1, 1, "x").unwrap();
        assert_eq!(platform.graphics().err(), Some(PlatformError::NoContext));
        platform.make_context_current(window).unwrap();
        assert!(platform.graphics().is_ok());
    }

    #[test]
    fn test_scripted_clock() {
        let platform = HeadlessPlatform::new().with_timestamps([1.0, 1.5]);
        assert_eq!(platform.now(), 1.0);
        assert_eq!(platform.now(), 1.5);
        assert_eq!(platform.now(), 1.5);

        let stepped = HeadlessPlatform::new().with_fixed_step(10.0, 0.5);
        assert_eq!(stepped.now(), 10.0);
        assert_eq!(stepped.now(), 10.5);
    }

    #[test]
    fn test_frame_limit_and_events() {
        let scroll = HostEvent::Scroll(ScrollEvent {
            window: PRIMARY_WINDOW,
            x_offset: 0.0,
            y_offset: 1.0,
        });
        let mut platform = HeadlessPlatform::new().with_frame_limit(2).with_event(1, scroll);
        platform.init().unwrap();
        let window = platform.create_window(1, 1, "x").unwrap();

        let mut events = Vec::new();
        platform.swap_buffers(window);
        platform.poll_events(&mut events);
        assert!(events.is_empty());
        assert!(!platform.should_close(window));

        platform.swap_buffers(window);
        platform.poll_events(&mut events);
        assert_eq!(events, vec![scroll]);
        assert!(platform.should_close(window));
    }

    #[test]
    fn test_terminate_destroys_window() {
        let mut platform = HeadlessPlatform::new();
        platform.init().unwrap();
        platform.create_window(1, 1, "x").unwrap();
        platform.terminate();
        platform.terminate();
        assert!(!platform.has_window());
        assert_eq!(platform.windows_destroyed(), 1);
        assert_eq!(platform.terminate_calls(), 2);
    }
}

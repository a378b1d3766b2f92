//! Window/engine context supplied by the application before `Engine::init`

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Settings the engine reads once at `init` and consumes when `run` returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineContext {
    /// Initial window width in screen coordinates
    pub window_width: u32,

    /// Initial window height in screen coordinates
    pub window_height: u32,

    /// Window title, at most [`EngineContext::MAX_TITLE_LEN`] bytes
    pub window_title: String,

    /// Hide and lock the cursor to the window (first-person mouse look)
    pub mouse_disabled: bool,
}

impl EngineContext {
    /// Longest accepted window title in bytes
    pub const MAX_TITLE_LEN: usize = 99;

    /// Create a context for a window of the given size and title
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            window_width: width,
            window_height: height,
            window_title: title.into(),
            mouse_disabled: false,
        }
    }

    /// Lock and hide the cursor while the window has focus
    #[must_use]
    pub const fn with_mouse_disabled(mut self, disabled: bool) -> Self {
        self.mouse_disabled = disabled;
        self
    }

    /// Check the context before the engine accepts it
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero (got {}x{})",
                self.window_width, self.window_height
            )));
        }

        if self.window_title.len() > Self::MAX_TITLE_LEN {
            return Err(ConfigError::Invalid(format!(
                "window title is {} bytes, limit is {}",
                self.window_title.len(),
                Self::MAX_TITLE_LEN
            )));
        }

        if self.window_title.contains('\0') {
            return Err(ConfigError::Invalid("window title contains a NUL byte".to_string()));
        }

        Ok(())
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(640, 480, "fps")
    }
}

impl Config for EngineContext {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_default_context_is_valid() {
        let ctx = EngineContext::default();
        assert!(ctx.validate().is_ok());
        assert_eq!((ctx.window_width, ctx.window_height), (640, 480));
    }

    #[test]
    fn test_validation_rejects_bad_contexts() {
        assert!(EngineContext::new(0, 480, "x").validate().is_err());
        assert!(EngineContext::new(640, 480, "a".repeat(100)).validate().is_err());
        assert!(EngineContext::new(640, 480, "a".repeat(99)).validate().is_ok());
        assert!(EngineContext::new(640, 480, "bad\0title").validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let ctx = EngineContext::from_str_with_format(
            "window_title = \"arena\"\nmouse_disabled = true\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(ctx.window_title, "arena");
        assert!(ctx.mouse_disabled);
        assert_eq!(ctx.window_width, 640);
    }

    #[test]
    fn test_ron_context() {
        let ctx = EngineContext::from_str_with_format(
            "(window_width: 800, window_height: 600, window_title: \"ron\")",
            ConfigFormat::Ron,
        )
        .unwrap();
        assert_eq!(ctx, EngineContext::new(800, 600, "ron"));
    }

    #[test]
    fn test_file_round_trip() {
        let ctx = EngineContext::new(800, 600, "arena").with_mouse_disabled(true);
        for ext in ["toml", "ron"] {
            let path = std::env::temp_dir()
                .join(format!("fps_engine_context_{}.{ext}", std::process::id()));
            ctx.save_to_file(&path).unwrap();
            let loaded = EngineContext::load_from_file(&path);
            std::fs::remove_file(&path).unwrap();
            assert_eq!(loaded.unwrap(), ctx, "{ext}");
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("fps_engine_context_missing.toml");
        let err = EngineContext::load_from_file(path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_unknown_extension() {
        let err = ConfigFormat::from_path(std::path::Path::new("ctx.json")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}

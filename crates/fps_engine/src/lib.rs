//! # FPS Engine
//!
//! A small real-time 3D engine: one window, filtered input callbacks, and an
//! immediate-mode renderer drawing a flat list of cubes and custom meshes.
//!
//! ## Features
//!
//! - **Filtered event callbacks**: subscribe to key, cursor, button, scroll and
//!   resize events with per-field wildcards
//! - **Fixed frame loop**: update, render, draw, post-render, present, poll
//! - **Immediate-mode renderer**: legacy OpenGL through GLFW, or a recording
//!   device for headless runs
//! - **Owned state**: no globals; callbacks receive `&mut Scene<S>`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fps_engine::prelude::*;
//!
//! #[derive(Default)]
//! struct Game {
//!     elapsed: f64,
//! }
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut engine = Engine::new(GlfwPlatform::new(), Game::default());
//!     engine.init(EngineContext::new(800, 600, "demo"))?;
//!
//!     engine.register_key_callback(
//!         Filter::Any,
//!         KeyCode::Escape,
//!         Filter::Any,
//!         Action::Press,
//!         Filter::Any,
//!         |scene: &mut Scene<Game>, _: &KeyEvent| scene.request_close(),
//!     )?;
//!     engine.register_prerun_callback(|scene, _| {
//!         if let Err(e) = scene.spawn(RenderableObject::cube()) {
//!             log::error!("spawn failed: {e}");
//!         }
//!     });
//!     engine.register_update_callback(|scene, dt| scene.state.elapsed += dt);
//!
//!     engine.run()
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod engine;
pub mod events;
pub mod foundation;
pub mod input;
pub mod platform;
pub mod render;

pub use config::EngineContext;
pub use engine::{Engine, EngineError, EngineResult, EngineState, Scene};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, EngineContext},
        engine::{Engine, EngineError, EngineResult, EngineState, Scene},
        events::{
            CursorEnterEvent, CursorMoveEvent, Filter, FramebufferResizeEvent, KeyEvent,
            MouseButtonEvent, ScrollEvent,
        },
        foundation::{
            logging::LogConfig,
            math::{Mat4, Vec3},
        },
        input::{Action, KeyCode, Modifiers, MouseButton},
        platform::{GlfwPlatform, Platform, WindowId},
        render::{
            DefinitionId, FirstPersonCamera, GraphicsDevice, ObjectKey, PolygonMode,
            RenderDefinition, RenderableObject,
        },
    };
}

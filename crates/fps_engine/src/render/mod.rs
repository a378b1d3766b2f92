//! Rendering system
//!
//! Immediate-mode drawing of a flat list of objects:
//! - [`GraphicsDevice`]: the command surface (OpenGL via [`LegacyGl`], or a
//!   [`RecordingDevice`] for headless runs)
//! - [`Renderer`]: live-object list and custom geometry registry
//! - [`FirstPersonCamera`]: view/projection math for render callbacks

pub mod backend;
pub mod camera;
pub mod definition;
pub mod gl;
pub mod object;
pub mod primitives;
pub mod recording;
pub mod renderer;

pub use backend::{GraphicsDevice, PolygonMode, Topology};
pub use camera::FirstPersonCamera;
pub use definition::{DefinitionId, RenderDefinition};
pub use gl::LegacyGl;
pub use object::{ObjectArena, ObjectKey, ObjectType, RenderableObject};
pub use recording::{DrawCall, DrawCommand, RecordingDevice};
pub use renderer::{DrawStats, Geometry, Renderer};

use thiserror::Error;

use crate::foundation::collections::ArrayError;

/// Rendering system errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `init` called twice
    #[error("renderer already initialized")]
    AlreadyInitialized,

    /// Operation before `init` or after `shutdown`
    #[error("renderer is not initialized")]
    NotInitialized,

    /// Object already on the draw list
    #[error("object {0:?} is already registered")]
    DuplicateObject(ObjectKey),

    /// Object not on the draw list
    #[error("object {0:?} is not registered")]
    UnknownObject(ObjectKey),

    /// Definition id already registered
    #[error("definition {0} is already registered")]
    DuplicateDefinition(DefinitionId),

    /// Definition id not registered
    #[error("definition {0} is not registered")]
    UnknownDefinition(DefinitionId),

    /// Definition data is malformed
    #[error("definition {id} is invalid: {reason}")]
    InvalidDefinition {
        /// Offending definition
        id: DefinitionId,
        /// What is wrong with it
        reason: String,
    },

    /// Backing array failure
    #[error("object list error: {0}")]
    Array(#[from] ArrayError),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

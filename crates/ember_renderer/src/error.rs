//! Errors raised while assembling and rendering a scene.

use ember_core::TextureError;
use thiserror::Error;

/// Errors that can occur during scene construction.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("shape {index} has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox { index: usize },

    #[error("scene contains no shapes")]
    EmptyScene,

    #[error("texture error: {0}")]
    Texture(#[from] TextureError),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to start render threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("pixel sink is {actual_width}x{actual_height}, render expects {width}x{height}")]
    SinkSize {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

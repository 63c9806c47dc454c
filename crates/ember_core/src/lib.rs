//! Ember Core - collaborators shared by the renderer and the tools.
//!
//! This crate provides:
//!
//! - **Textures**: `Texture` lookups (solid, checker, image-sampled)
//! - **Raster output**: the `PixelSink` interface and an in-memory
//!   `ImageBuffer` that encodes to disk through the `image` crate

pub mod raster;
pub mod texture;

// Re-export commonly used types
pub use raster::{ImageBuffer, ImageError, PixelSink, Rgb8};
pub use texture::{
    CheckerTexture, Color, ImageTexture, SolidColor, Texture, TextureError, TextureResult,
};
